use patentsmith_core::patent::{
    DocumentPatch, DocumentStatus, PatentDocument, PatentRepository, StoreSnapshot,
};
use patentsmith_infrastructure::JsonPatentRepository;
use patentsmith_infrastructure::storage::backup_path_for;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn document(id: &str, status: DocumentStatus) -> PatentDocument {
    let mut doc = PatentDocument::new(
        id,
        format!("Title {id}"),
        vec!["hot-swap fans".to_string(), "liquid cooling".to_string()],
        format!("Full text of {id}"),
        status,
    );
    doc.generated_at = "2024-05-01 10:00:00".to_string();
    doc
}

fn read_snapshot(path: &Path) -> StoreSnapshot {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_round_trip_through_fresh_store() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("patents.json");

    let originals: Vec<PatentDocument> = (1..=5)
        .map(|n| {
            let status = if n % 2 == 0 { DocumentStatus::Error } else { DocumentStatus::Draft };
            document(&format!("patent_100_{n}"), status)
        })
        .collect();

    let repo = JsonPatentRepository::open(path.clone());
    repo.append(originals.clone()).await.unwrap();

    let snapshot = read_snapshot(&path);
    assert_eq!(snapshot.total_count, 5);
    assert_eq!(snapshot.total_count, snapshot.patents.len());

    let fresh = JsonPatentRepository::open(path);
    assert_eq!(fresh.list().await, originals);
}

#[tokio::test]
async fn test_backup_holds_pre_append_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("patents.json");

    // Pre-existing file with two records.
    let existing = StoreSnapshot::new(vec![
        document("patent_1_1", DocumentStatus::Draft),
        document("patent_1_2", DocumentStatus::Error),
    ]);
    fs::write(&path, serde_json::to_string_pretty(&existing).unwrap()).unwrap();
    let existing_bytes = fs::read(&path).unwrap();

    let repo = JsonPatentRepository::open(path.clone());
    repo.append(vec![document("patent_2_3", DocumentStatus::Draft)])
        .await
        .unwrap();

    let backup_path = backup_path_for(&path);
    assert_eq!(fs::read(&backup_path).unwrap(), existing_bytes);
    assert_eq!(read_snapshot(&backup_path).patents.len(), 2);

    let primary = read_snapshot(&path);
    assert_eq!(primary.total_count, 3);
    assert_eq!(primary.patents[2].id, "patent_2_3");
}

#[tokio::test]
async fn test_empty_patch_only_sets_updated_at() {
    let temp_dir = TempDir::new().unwrap();
    let repo = JsonPatentRepository::open(temp_dir.path().join("patents.json"));
    let original = document("patent_1_1", DocumentStatus::Draft);
    repo.append(vec![original.clone()]).await.unwrap();

    assert!(repo.update("patent_1_1", DocumentPatch::default()).await.unwrap());

    let mut updated = repo.get_by_id("patent_1_1").await.unwrap();
    assert!(updated.updated_at.is_some());
    updated.updated_at = None;
    assert_eq!(updated, original);
}

#[tokio::test]
async fn test_update_persists() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("patents.json");
    let repo = JsonPatentRepository::open(path.clone());
    repo.append(vec![document("patent_1_1", DocumentStatus::Draft)])
        .await
        .unwrap();

    let patch = DocumentPatch {
        content: Some("revised claims".to_string()),
        status: Some(DocumentStatus::Optimized),
        ..Default::default()
    };
    assert!(repo.update("patent_1_1", patch).await.unwrap());

    let stored = &read_snapshot(&path).patents[0];
    assert_eq!(stored.content, "revised claims");
    assert_eq!(stored.status, DocumentStatus::Optimized);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_are_serialized() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("patents.json");
    let repo = Arc::new(JsonPatentRepository::open(path.clone()));

    let handles: Vec<_> = (0..20)
        .map(|n| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                repo.append(vec![document(&format!("patent_7_{n}"), DocumentStatus::Draft)])
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(repo.list().await.len(), 20);
    let snapshot = read_snapshot(&path);
    assert_eq!(snapshot.total_count, 20);
    assert_eq!(snapshot.patents.len(), 20);
}

#[tokio::test]
async fn test_exports_and_statistics() {
    let temp_dir = TempDir::new().unwrap();
    let repo = JsonPatentRepository::open(temp_dir.path().join("patents.json"));
    repo.append(vec![
        document("patent_1_1", DocumentStatus::Draft),
        document("patent_1_2", DocumentStatus::Draft),
        document("patent_1_3", DocumentStatus::Draft),
        document("patent_1_4", DocumentStatus::Error),
    ])
    .await
    .unwrap();

    let json: Vec<PatentDocument> = serde_json::from_str(&repo.export_json().await.unwrap()).unwrap();
    assert_eq!(json.len(), 4);

    let text = repo.export_text().await;
    assert!(text.contains("ID: patent_1_4"));
    assert!(text.contains("Status: error"));

    let stats = repo.statistics().await;
    assert_eq!(stats.total_patents, 4);
    assert_eq!(stats.draft_patents, 3);
    assert_eq!(stats.error_patents, 1);
    assert!((stats.success_rate - 75.0).abs() < 1e-9);
}
