pub mod configuration;
pub mod devices;
pub mod endpoints;
pub mod reqwest_helpers;
pub mod resources;

pub use configuration::ClientConfiguration;
pub use devices::{registration_failure_message, DeviceRegistration, DeviceResources};
pub use endpoints::Endpoints;
pub use resources::{ResourceAccessor, ResourcesGetter};
