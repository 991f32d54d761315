//! Scene browser core for Kestrel wildlife photo tables.
//!
//! Turns the flat per-image record table into scenes (bursts of images sharing
//! a capture-session id), filters scenes by species keyword, and plans the
//! responsive tile grid they are shown in. Presentation concerns (image
//! decoding, external programs, the table file itself) sit behind the traits in
//! [`collaborators`].

pub mod collaborators;
pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod navigation;
pub mod scenes;
pub mod session;

pub use config::BrowserConfig;
pub use error::{AdvisoryError, ConfigError, EmptyInputError, GridError, LoadError};
pub use models::{ImageRecord, RecordStore, SceneId, SceneSummary};
pub use navigation::{DetailView, DetailViews, NavigationModel};
pub use scenes::{aggregate, filter_scenes, FilteredSceneView};
pub use session::{BrowserSession, Snapshot};
