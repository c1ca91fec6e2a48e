//! Rendering binding for a registered menu.
//!
//! Keeps a filtered, active-marked view of one menu up to date as the
//! current path and the user's permissions change, and publishes each new
//! view on a watch channel for the rendering layer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info};

use super::active::set_active_recursively;
use super::filter::MenuPermissionService;
use super::item::MenuItem;
use super::registry::Menu;
use crate::events::PermissionEvents;

/// Live view of a menu for one user session.
pub struct MenuBinding {
    menu: Arc<Menu>,
    service: MenuPermissionService,
    current_path: RwLock<String>,
    /// Number of the latest refresh started.
    sequence: AtomicU64,
    /// Held while a refresh checks its ticket and publishes.
    publishing: Mutex<()>,
    view: watch::Sender<MenuItem>,
}

impl MenuBinding {
    /// Bind a menu. The view starts as the bare root until the first
    /// refresh completes.
    pub fn new(menu: Arc<Menu>, service: MenuPermissionService) -> Self {
        let (view, _) = watch::channel(menu.read(MenuItem::shell));
        Self {
            menu,
            service,
            current_path: RwLock::new(String::new()),
            sequence: AtomicU64::new(0),
            publishing: Mutex::new(()),
            view,
        }
    }

    /// The bound menu.
    pub fn menu(&self) -> &Arc<Menu> {
        &self.menu
    }

    /// The path the view is marked against.
    pub fn current_path(&self) -> String {
        self.current_path.read().clone()
    }

    /// The latest published view.
    pub fn current(&self) -> MenuItem {
        self.view.borrow().clone()
    }

    /// Receive every newly published view.
    pub fn subscribe(&self) -> watch::Receiver<MenuItem> {
        self.view.subscribe()
    }

    /// Stream of views, starting with the current one.
    pub fn views(&self) -> WatchStream<MenuItem> {
        WatchStream::new(self.view.subscribe())
    }

    /// Navigate to a new path and refresh the view.
    pub async fn route_changed(&self, path: &str) -> bool {
        *self.current_path.write() = path.to_string();
        self.refresh().await
    }

    /// React to a change in the user's permissions. Answers the
    /// authorizer cached for the old permissions are dropped first.
    pub async fn permissions_changed(&self) -> bool {
        self.service.invalidate();
        self.refresh().await
    }

    /// Re-filter the canonical menu and mark the active path.
    ///
    /// Returns false when a newer refresh started while this one was
    /// waiting on permission checks; the older result is discarded so it
    /// can never overwrite a newer view.
    pub async fn refresh(&self) -> bool {
        let ticket = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let canonical = self.menu.snapshot();
        let view = self.service.filter(&canonical).await;
        self.publish(ticket, view)
    }

    /// Mark and publish a filtered view unless a newer refresh has started.
    ///
    /// The ticket check and the send happen under one lock, so a newer
    /// refresh always publishes after an older one that passed its check.
    fn publish(&self, ticket: u64, mut view: MenuItem) -> bool {
        let _publishing = self.publishing.lock();
        if self.sequence.load(Ordering::SeqCst) != ticket {
            debug!(menu = %self.menu.name(), ticket, "stale menu view discarded");
            return false;
        }

        let path = self.current_path();
        set_active_recursively(&path, &mut view);
        self.view.send_replace(view);
        debug!(menu = %self.menu.name(), path = %path, ticket, "menu view published");
        true
    }

    /// Refresh on every permission change until the event source is
    /// dropped.
    pub fn listen(self: Arc<Self>, events: &PermissionEvents) -> JoinHandle<()> {
        let mut rx = events.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(()) => {
                        self.permissions_changed().await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "permission events lagged");
                        self.permissions_changed().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            info!(menu = %self.menu.name(), "menu binding stopped listening");
        })
    }
}
