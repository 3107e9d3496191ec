pub mod aggregate;

pub use aggregate::{
    Procurement, ProcurementDto, ProcurementId, ProcurementStatus, ProcurementType,
};
