pub mod aggregate;

pub use aggregate::{
    EffectiveOptions, OptionInfo, SeriesOption, SeriesOptionDto, SeriesOptionId,
};
