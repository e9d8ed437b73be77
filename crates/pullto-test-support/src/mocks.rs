//! Mock implementations for testing

use async_trait::async_trait;
use pullto_foundation::{FileHandle, NotifyLevel, PullResult, WorkspaceHost};
use mockall::mock;

mock! {
    pub WorkspaceHost {}

    #[async_trait]
    impl WorkspaceHost for WorkspaceHost {
        async fn find_files_by_name(&self, file_name: &str) -> Vec<FileHandle>;
        async fn read_text(&self, file: &FileHandle) -> PullResult<String>;
        async fn write_text(&self, file: &FileHandle, text: &str) -> bool;
        fn notify(&self, level: NotifyLevel, message: &str);
    }
}
