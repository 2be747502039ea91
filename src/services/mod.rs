pub mod lookup;
pub mod scan;

pub use lookup::{
    BeanRegistry, DefaultValueResolver, InjectedValues, PropertyResolver, TypeIntrospector,
};
pub use scan::{ClassMatch, ScanService, ScanStatus};
