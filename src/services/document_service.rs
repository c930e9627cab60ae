//! Document Service
//!
//! Internal documents of the school. Only metadata is kept.

use serde::Deserialize;

use crate::models::document::format_size;
use crate::models::{new_id, SchoolDocument};
use crate::services::store::CrmStore;
use crate::services::ServiceResult;

/// Metadata of an uploaded file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpload {
    pub name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRename {
    pub name: String,
}

/// Document service
#[derive(Debug, Clone)]
pub struct DocumentService {
    store: CrmStore,
}

impl DocumentService {
    pub fn new(store: CrmStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<SchoolDocument> {
        self.store.list().await
    }

    pub async fn upload(&self, upload: DocumentUpload) -> ServiceResult<SchoolDocument> {
        let name = upload.name.trim().to_string();
        let document = SchoolDocument {
            id: new_id(),
            kind: SchoolDocument::kind_from_name(&name),
            size: format_size(upload.size_bytes),
            date: self.store.clock().today(),
            name,
        };
        let (document, _) = self.store.upsert(document).await?;
        Ok(document)
    }

    /// Change the file name; the kind follows the new extension
    pub async fn rename(&self, id: &str, rename: DocumentRename) -> ServiceResult<SchoolDocument> {
        let name = rename.name.trim().to_string();
        self.store
            .replace(id, |existing: &SchoolDocument| {
                Ok(SchoolDocument {
                    kind: SchoolDocument::kind_from_name(&name),
                    name,
                    ..existing.clone()
                })
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> ServiceResult<SchoolDocument> {
        self.store.remove(id).await
    }
}
