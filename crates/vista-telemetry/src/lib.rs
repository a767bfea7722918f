pub mod aggregate;
pub mod decode;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod presence;
pub mod registry;
pub mod window;

pub use aggregate::{LatestValue, SeriesStats, TimeBucket};
pub use decode::{decode, DecodedEvent, StatusUpdate, TelemetryData};
pub use error::DecodeError;
pub use model::{series_key, Device, DeviceUpdate, SensorReading};
pub use pipeline::TelemetryPipeline;
pub use presence::{is_online, ONLINE_THRESHOLD_MS};
pub use registry::DeviceRegistry;
pub use window::{SensorWindow, WINDOW_CAPACITY};
