//! Selection over an already-loaded list.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::watch;

use super::ResourceStore;
use crate::types::Identified;

/// Selected-item view resolved against a [`ResourceStore`]'s current page.
///
/// Reports and audit events carry everything the console shows in their list
/// rows, so selecting one needs no request of its own.
pub struct SelectionProjection<T> {
    source: Arc<ResourceStore<T>>,
    selected: watch::Sender<Option<String>>,
}

impl<T> SelectionProjection<T>
where
    T: DeserializeOwned + Identified + Clone + Send + Sync + 'static,
{
    pub fn new(source: Arc<ResourceStore<T>>) -> Self {
        Self {
            source,
            selected: watch::Sender::new(None),
        }
    }

    pub fn select(&self, id: &str) {
        self.selected.send_replace(Some(id.to_string()));
    }

    pub fn clear(&self) {
        self.selected.send_replace(None);
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selected.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.selected.subscribe()
    }

    /// The selected item, if it is on the loaded page.
    pub fn current(&self) -> Option<T> {
        let id = self.selected_id()?;
        self.source
            .state()
            .items
            .into_iter()
            .find(|item| item.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Report;
    use crate::testing::{page_of, MockAdminApi};
    use crate::types::ResourceKind;
    use serde_json::json;

    fn report(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "targetType": "experience",
            "targetId": "e1",
            "reason": "misleading photos",
            "status": "open"
        })
    }

    #[tokio::test]
    async fn test_projection_follows_list_contents() {
        let api = Arc::new(
            MockAdminApi::new().with_response("/reports", page_of(vec![report("r1"), report("r2")], 1, 1)),
        );
        let reports = Arc::new(ResourceStore::<Report>::for_kind(ResourceKind::Report, api.clone(), 20));
        let selected = SelectionProjection::new(reports.clone());

        selected.select("r2");
        assert!(selected.current().is_none());

        reports.refresh().await;
        assert_eq!(selected.current().unwrap().id, "r2");

        api.set_response("/reports", page_of(vec![report("r1")], 1, 1));
        reports.refresh().await;
        assert!(selected.current().is_none());
        assert_eq!(selected.selected_id().as_deref(), Some("r2"));
    }
}
