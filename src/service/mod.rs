pub mod auditor;
pub mod export;

pub use auditor::DossierAuditor;
pub use export::export_alerts_to_csv;
