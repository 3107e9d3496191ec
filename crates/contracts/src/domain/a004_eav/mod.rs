pub mod attribute;
pub mod value;

pub use attribute::{EavAttribute, EavAttributeDto, EavAttributeId, EavValueType};
pub use value::{
    EavEntityData, EavFilter, EavFilterOperation, EavSearchQuery, EavValue, EavValueId, EavValueQuery,
    SetEavValueRequest,
};
