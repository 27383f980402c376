mod attribute;
pub use attribute::{CorrelatedAttribute, ContainerKind, Correlator, FetchStrategy};

mod config;
pub use config::{AttributeConfig, Config};

mod engine;
pub use engine::{Builder, Engine};

pub mod provider;
pub use provider::{CorrelationBuilder, CorrelationProvider};

mod view;
pub use view::{ViewContext, ViewType};

pub use correlate_core::{
    bail, driver, err,
    stmt::{self, Value, ValueRecord},
    Error, Result,
};
