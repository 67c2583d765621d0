//! AT-SPI access over the accessibility D-Bus (Linux).
//!
//! The atspi proxies are async. Callers drive them through [`block_on`],
//! which runs a private current-thread tokio runtime for one query.

use std::future::Future;

use atspi::proxy::accessible::AccessibleProxy;
use atspi::proxy::component::ComponentProxy;
use atspi::proxy::text::TextProxy;
use atspi::{AccessibilityConnection, CoordType, Interface, ObjectRef, State};
use zbus::fdo::DBusProxy;
use zbus::names::BusName;
use zbus::proxy::CacheProperties;

const REGISTRY_BUS: &str = "org.a11y.atspi.Registry";
const ROOT_PATH: &str = "/org/a11y/atspi/accessible/root";

/// Build an uncached proxy of the given type for a node.
///
/// Property caching would subscribe to change signals for every element we
/// touch once.
macro_rules! proxy_for {
    ($proxy:ident, $conn:expr, $node:expr) => {
        $proxy::builder($conn)
            .destination($node.bus.clone())?
            .path($node.path.clone())?
            .cache_properties(CacheProperties::No)
            .build()
            .await
    };
}

/// Address of one accessible object on the bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) bus: String,
    pub(crate) path: String,
}

impl Node {
    fn registry_root() -> Self {
        Self {
            bus: REGISTRY_BUS.to_string(),
            path: ROOT_PATH.to_string(),
        }
    }
}

impl From<ObjectRef> for Node {
    fn from(object: ObjectRef) -> Self {
        Self {
            bus: object.name.as_str().to_string(),
            path: object.path.as_str().to_string(),
        }
    }
}

/// Properties read from one accessible element
#[derive(Debug, Clone, Default)]
pub(crate) struct Element {
    pub(crate) role: String,
    pub(crate) name: String,
    pub(crate) text: Option<String>,
    /// Screen extents as (x, y, width, height)
    pub(crate) extents: Option<(i32, i32, i32, i32)>,
    pub(crate) enabled: bool,
    pub(crate) editable: bool,
}

/// Run one AT-SPI query to completion on a fresh current-thread runtime
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start AT-SPI runtime: {}", e))?;
    Ok(runtime.block_on(future))
}

pub(crate) struct Bus {
    conn: zbus::Connection,
}

impl Bus {
    pub(crate) async fn connect() -> Result<Self, String> {
        let a11y = AccessibilityConnection::new()
            .await
            .map_err(|e| format!("cannot reach the accessibility bus: {}", e))?;
        Ok(Self {
            conn: a11y.connection().clone(),
        })
    }

    async fn accessible(&self, node: &Node) -> zbus::Result<AccessibleProxy<'static>> {
        proxy_for!(AccessibleProxy, &self.conn, node)
    }

    pub(crate) async fn children(&self, node: &Node) -> zbus::Result<Vec<Node>> {
        let proxy = self.accessible(node).await?;
        let children = proxy.get_children().await?;
        Ok(children.into_iter().map(Node::from).collect())
    }

    /// Find the frame titled `title` owned by the application with `pid`.
    ///
    /// Applications register on the bus under their own connection, so the
    /// connection's unix pid identifies the owning process.
    pub(crate) async fn find_window(&self, pid: u32, title: &str) -> Result<Option<Node>, String> {
        let dbus = DBusProxy::new(&self.conn)
            .await
            .map_err(|e| e.to_string())?;
        let apps = self
            .children(&Node::registry_root())
            .await
            .map_err(|e| format!("failed to list AT-SPI applications: {}", e))?;

        for app in apps {
            let Ok(bus_name) = BusName::try_from(app.bus.clone()) else {
                continue;
            };
            if dbus.get_connection_unix_process_id(bus_name).await.ok() != Some(pid) {
                continue;
            }

            let frames = self.children(&app).await.map_err(|e| e.to_string())?;
            for frame in frames {
                let Ok(proxy) = self.accessible(&frame).await else {
                    continue;
                };
                if proxy.name().await.is_ok_and(|name| name == title) {
                    return Ok(Some(frame));
                }
            }
        }
        Ok(None)
    }

    pub(crate) async fn element(&self, node: &Node) -> zbus::Result<Element> {
        let proxy = self.accessible(node).await?;
        let role = proxy.get_role_name().await?;
        let name = proxy.name().await.unwrap_or_default();
        let states = proxy.get_state().await?;
        let interfaces = proxy.get_interfaces().await?;

        let extents = if interfaces.contains(Interface::Component) {
            let component: ComponentProxy<'static> = proxy_for!(ComponentProxy, &self.conn, node)?;
            component.get_extents(CoordType::Screen).await.ok()
        } else {
            None
        };

        let text = if interfaces.contains(Interface::Text) {
            let text: TextProxy<'static> = proxy_for!(TextProxy, &self.conn, node)?;
            text.get_text(0, -1).await.ok().filter(|t| !t.is_empty())
        } else {
            None
        };

        Ok(Element {
            role,
            name,
            text,
            extents,
            enabled: states.contains(State::Enabled) && states.contains(State::Sensitive),
            editable: states.contains(State::Editable),
        })
    }
}
