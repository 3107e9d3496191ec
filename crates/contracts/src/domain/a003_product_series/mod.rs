pub mod aggregate;

pub use aggregate::{
    EffectiveSeries, ProductSeries, ProductSeriesDto, ProductSeriesId, ResolvedValue, SeriesField,
};
