pub mod aggregate;
pub mod data;
pub mod parts;

pub use aggregate::{DimensionTable, DimensionTableDto, DimensionTableId};
pub use data::{
    DimensionData, DimensionDataQuery, DimensionMatrix, DrawingImage, DuplicateTableRequest,
    SeriesDimensionData,
};
pub use parts::{
    DimensionCell, DimensionCellDto, DimensionCellId, DimensionParameter, DimensionParameterDto,
    DimensionParameterId, TableDrawing, TableDrawingDto, TableDrawingId,
};
