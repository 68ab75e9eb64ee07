//! Interaction and layout engine for an infinite task-board canvas.
//!
//! The engine owns everything between raw host input and draw calls: the
//! viewport transform, the working set of notes, selection, the pointer
//! gesture state machine, Freeform/Kanban/Grid layout, and culling. The host
//! feeds it window events and task data, draws through a [`render::Surface`],
//! and persists whatever the outbound [`events::CanvasEvent`]s ask for. The
//! engine never writes task metadata itself.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Canvas controller and testable [`engine::EngineCore`] |
//! | [`geometry`] | Points, sizes, rectangles and intersection |
//! | [`camera`] | Viewport transform, pan/zoom and coordinate conversions |
//! | [`doc`] | Notes and the in-memory item store with draw order |
//! | [`board`] | Boards, layout modes and bucket rules |
//! | [`selection`] | Selection set with change coalescing |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Topmost-item hit testing |
//! | [`layout`] | Freeform placement, Kanban columns and Grid sections |
//! | [`drag`] | Bucket drag payloads and drop resolution |
//! | [`cull`] | Visible-set computation |
//! | [`render`] | Scene snapshot and drawing through a host surface |
//! | [`events`] | Outbound events and listener registry |
//! | [`config`] | Engine configuration with JSON and env overrides |
//! | [`consts`] | Default numeric constants |

pub mod board;
pub mod camera;
pub mod config;
pub mod consts;
pub mod cull;
pub mod doc;
pub mod drag;
pub mod engine;
pub mod events;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod layout;
pub mod render;
pub mod selection;
