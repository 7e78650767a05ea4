pub mod diagram;
pub mod graph;
pub mod layout;
pub mod measure;
pub mod schema;
pub mod session;

use wasm_bindgen::prelude::*;

use schema::TableCatalog;
use session::LayoutSession;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Lay out a schema and return the diagram as JSON. With a focus id the
/// one-hop focus layout is produced, otherwise the whole-schema overview.
#[wasm_bindgen(js_name = "schemaToDiagram")]
pub fn schema_to_diagram(
    tables_json: &str,
    focus: Option<String>,
    normalize: Option<bool>,
) -> Result<String, String> {
    let catalog = TableCatalog::from_json(tables_json).map_err(|e| e.to_string())?;

    let mut session = LayoutSession::new(catalog);
    match focus {
        Some(id) => session.reset(&id, true),
        None => session.rebuild_whole(),
    }

    let mut snapshot = session.snapshot();
    if normalize.unwrap_or(false) {
        diagram::normalize(&mut snapshot, diagram::VIEWPORT_PADDING);
    }

    serde_json::to_string(&snapshot).map_err(|e| e.to_string())
}

/// Expand/collapse session exported to the canvas layer. Ids passed in are
/// table ids from earlier snapshots; unknown ids are ignored.
#[wasm_bindgen]
pub struct ErdSession {
    inner: LayoutSession,
}

#[wasm_bindgen]
impl ErdSession {
    #[wasm_bindgen(constructor)]
    pub fn new(tables_json: &str) -> Result<ErdSession, String> {
        let catalog = TableCatalog::from_json(tables_json).map_err(|e| e.to_string())?;
        Ok(ErdSession {
            inner: LayoutSession::new(catalog),
        })
    }

    /// Re-seed the session around a focus table.
    pub fn reset(&mut self, focus_id: &str, auto_expand: bool) {
        self.inner.reset(focus_id, auto_expand);
    }

    /// Show the whole schema at once.
    #[wasm_bindgen(js_name = "rebuildWhole")]
    pub fn rebuild_whole(&mut self) {
        self.inner.rebuild_whole();
    }

    pub fn expand(&mut self, table_id: &str) {
        self.inner.expand(table_id);
    }

    pub fn collapse(&mut self, table_id: &str) {
        self.inner.collapse(table_id);
    }

    #[wasm_bindgen(js_name = "isExpanded")]
    pub fn is_expanded(&self, table_id: &str) -> bool {
        self.inner.is_expanded(table_id)
    }

    #[wasm_bindgen(js_name = "hasRelations")]
    pub fn has_relations(&self, table_id: &str) -> bool {
        self.inner.has_relations(table_id)
    }

    /// Current visible nodes and edges as JSON.
    pub fn snapshot(&self) -> Result<String, String> {
        serde_json::to_string(&self.inner.snapshot()).map_err(|e| e.to_string())
    }
}
