//! Application-Layer: Store, Reconciler, View-Sync, Fit, Handler und Controller.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod fit;
pub mod reconciler;
pub mod scene;
pub mod store;
pub mod tools;
pub mod view_sync;

pub use command_log::CommandLog;
pub use controller::MapController;
pub use events::{MapEvent, NotificationLevel, PointerEventClass, StoreChange, StoreCommand};
pub use fit::{FitController, FitOptions, FitRequest};
pub use reconciler::{
    LayerReconciler, ReconcileContext, ReconcilePlan, ReconcileReport, SettleOutcome,
    SettledLayer,
};
pub use scene::{DeferredResource, PendingSettlement, Scene};
pub use store::{MapStore, MapStoreState, Notification};
pub use tools::{HandlerKind, HandlerOptions, HandlerRegistry, MapHandler, ToolHandler};
pub use view_sync::{plan_view_sync, ViewSynchronizer};
