mod assembler;
mod derivation;
mod error;
mod filtering;
mod registry;
mod types;

pub use error::MeteogramError;

pub use assembler::{Meteogram, MeteogramAssembler, ParameterToggles};
pub use registry::PhenomenonRegistry;

pub use types::forecast_term::ForecastTerm;
pub use types::parameter::Parameter;
pub use types::phenomenon::{Phenomenon, PhenomenonKind};
pub use types::resolution::TimeResolution;
pub use types::value_item::{PhenomenonValue, ValueItem};

pub use derivation::accumulation::accumulated_precipitation;
pub use derivation::error::DeriveError;
pub use derivation::spline::{cardinal_spline, hybrid_spline, DEFAULT_PRECISION, DEFAULT_TENSION};
pub use derivation::threshold::insert_threshold_crossings;

pub use filtering::{
    AfterDate, BeforeDate, EveryNth, InListFromDate, IndexLessThan, ItemFilter, LessOrEqualNumber,
    OverlappingTime,
};
