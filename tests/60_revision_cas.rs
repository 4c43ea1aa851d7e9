mod common;

use anyhow::Result;
use storykeep_api::database::models::{NewCodexEntry, NewSeries};
use storykeep_api::database::{CodexKind, CodexStore, Database, OwnedGateway, SeriesStore};
use storykeep_api::services::AccountService;

// Updates are compare-and-swap on the revision column: a save only lands if
// the row still carries the revision the writer fetched. Handlers re-fetch
// on every request, so sequential HTTP calls can never miss the swap; these
// tests drive the stores directly with a deliberately stale record, the way
// two racing requests would interleave.

fn unique_email(tag: &str) -> String {
    format!("{}-{}@example.com", tag, uuid::Uuid::new_v4().simple())
}

#[tokio::test]
async fn stale_series_save_misses_the_swap() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    Database::migrate().await?;
    let pool = Database::pool().await?.clone();

    let user = AccountService::new(pool.clone())
        .register("Rell", &unique_email("rell"), "correct-horse")
        .await?;

    let store = SeriesStore::new(pool);
    let series = store
        .create(
            user.id,
            NewSeries {
                title: "The Ember Cycle".to_string(),
                summary: None,
            },
        )
        .await?;
    assert_eq!(series.revision, 1);

    // The first writer lands and moves the revision.
    let mut renamed = series.clone();
    renamed.title = "The Ash Cycle".to_string();
    let saved = store.save(&renamed).await?.expect("fresh save lands");
    assert_eq!(saved.revision, 2);

    // `series` still carries revision 1, like a second writer that fetched
    // before the rename. Its save must come back empty, not overwrite.
    assert!(store.save(&series).await?.is_none());

    // The earlier write survived untouched.
    let current = store
        .get_for_principal(series.id, user.id)
        .await?
        .expect("series still present");
    assert_eq!(current.title, "The Ash Cycle");
    assert_eq!(current.revision, 2);

    Ok(())
}

#[tokio::test]
async fn stale_codex_save_misses_the_swap() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    Database::migrate().await?;
    let pool = Database::pool().await?.clone();

    let user = AccountService::new(pool.clone())
        .register("Rell", &unique_email("rell-codex"), "correct-horse")
        .await?;

    let series = SeriesStore::new(pool.clone())
        .create(
            user.id,
            NewSeries {
                title: "The Vale".to_string(),
                summary: None,
            },
        )
        .await?;

    let kind = CodexKind::from_slug("characters").expect("registered kind");
    let store = CodexStore::new(kind, pool);

    let draft = NewCodexEntry {
        name: "Ash Rell".to_string(),
        summary: None,
        details: None,
        series_id: None,
        book_id: None,
    };
    let entry = store.create(&draft, Some(series.id), None).await?;
    assert_eq!(entry.revision, 1);

    let mut renamed = entry.clone();
    renamed.name = "Ash of the Vale".to_string();
    let saved = store.save(&renamed).await?.expect("fresh save lands");
    assert_eq!(saved.revision, 2);

    // The stale copy still claims revision 1; it must not land.
    assert!(store.save(&entry).await?.is_none());

    Ok(())
}
