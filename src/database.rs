//! Local JSON file storage
//!
//! Every collection of the school lives in one pretty-printed JSON document,
//! rewritten in full after each change.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::models::{
    AuthRecord, Notification, Payment, PracticalClass, Record, SchoolDocument, Student, Teacher,
    TheoreticalClass, Vehicle,
};

/// Everything the back office stores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmData {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub practical_classes: Vec<PracticalClass>,
    #[serde(default)]
    pub theoretical_classes: Vec<TheoreticalClass>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub documents: Vec<SchoolDocument>,
    #[serde(default)]
    pub auth: AuthRecord,
}

/// A record type with a home collection inside [`CrmData`]
pub trait Collection: Record {
    fn collection(data: &CrmData) -> &Vec<Self>;
    fn collection_mut(data: &mut CrmData) -> &mut Vec<Self>;
}

macro_rules! collection {
    ($record:ty, $field:ident) => {
        impl Collection for $record {
            fn collection(data: &CrmData) -> &Vec<Self> {
                &data.$field
            }

            fn collection_mut(data: &mut CrmData) -> &mut Vec<Self> {
                &mut data.$field
            }
        }
    };
}

collection!(Student, students);
collection!(Teacher, teachers);
collection!(Vehicle, vehicles);
collection!(PracticalClass, practical_classes);
collection!(TheoreticalClass, theoretical_classes);
collection!(Payment, payments);
collection!(Notification, notifications);
collection!(SchoolDocument, documents);

impl CrmData {
    /// Linear lookup by id
    pub fn find<T: Collection>(&self, id: &str) -> Option<&T> {
        T::collection(self).iter().find(|r| r.id() == id)
    }
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Data directory '{0}' is not writable")]
    NotWritable(String),
}

/// JSON file database
#[derive(Debug, Clone)]
pub struct Database {
    file_path: PathBuf,
}

impl Database {
    /// Open the store file inside `data_dir`, creating the directory if needed
    pub async fn open(data_dir: &Path, file_name: &str) -> Result<Self, StoreError> {
        Self::ensure_data_directory_exists(data_dir).await?;
        let file_path = data_dir.join(file_name);
        info!("Using JSON file storage: {}", file_path.display());
        Ok(Self { file_path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Load the stored data, or write and return `init()` when no file exists yet
    pub async fn load_or_init(
        &self,
        init: impl FnOnce() -> CrmData,
    ) -> Result<CrmData, StoreError> {
        if fs::try_exists(&self.file_path).await? {
            let data = self.read().await?;
            debug!(
                students = data.students.len(),
                teachers = data.teachers.len(),
                "Loaded existing data file"
            );
            return Ok(data);
        }

        info!("Creating new data file");
        let data = init();
        self.write(&data).await?;
        Ok(data)
    }

    /// Ensures the data directory exists and is writable
    async fn ensure_data_directory_exists(path: &Path) -> Result<(), StoreError> {
        if !fs::try_exists(path).await? {
            info!("Creating data directory: {}", path.display());
            fs::create_dir_all(path).await?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let mut permissions = fs::metadata(path).await?.permissions();
                permissions.set_mode(0o755); // rwxr-xr-x
                fs::set_permissions(path, permissions).await?;
            }
        }

        let test_file = path.join(".autoescuela_write_test");
        if fs::write(&test_file, "test").await.is_err() {
            return Err(StoreError::NotWritable(path.display().to_string()));
        }
        let _ = fs::remove_file(&test_file).await;

        Ok(())
    }

    pub async fn read(&self) -> Result<CrmData, StoreError> {
        let contents = fs::read_to_string(&self.file_path).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Replace the file contents; goes through a sibling temp file so a crash
    /// never leaves a truncated document behind
    pub async fn write(&self, data: &CrmData) -> Result<(), StoreError> {
        let json_data = serde_json::to_string_pretty(data)?;
        let tmp_path = self.file_path.with_extension("json.tmp");

        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(json_data.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, &self.file_path).await?;
        Ok(())
    }
}
