//! Monitor state and logic
//!
//! Everything between the kernel sources and the renderers: the command
//! surface, runtime configuration, the delta/filter/sort pipeline, the
//! snapshot store and the sampling loop that drives them.

pub mod cancel;
pub mod cli;
pub mod config;
pub mod delta;
pub mod filter;
pub mod input;
pub mod navigation;
pub mod sampler;
pub mod sort;
pub mod store;
pub mod view_mode;

pub use cancel::{install_signal_handler, CancelToken};
pub use cli::Args;
pub use config::{DisplayOptions, Params, RuntimeConfig};
pub use delta::{compute_deltas, DeltaRecord};
pub use filter::FilterChain;
pub use input::{Controls, KeyAction, TaskRow};
pub use sampler::Sampler;
pub use sort::{sort_records, SortColumn};
pub use store::SnapshotStore;
pub use view_mode::ViewMode;
