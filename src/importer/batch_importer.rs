// ==========================================
// Academic Import System - Batch Importer
// ==========================================
// Pipeline orchestrator: parse -> snapshot fetch -> normalize ->
// validate -> classify -> (user confirms) -> commit.
// One logical thread of control per import attempt; the snapshot is
// fetched once per run and read-only for its duration.
// ==========================================

use crate::config::ImportConfig;
use crate::domain::row::RawRow;
use crate::domain::types::EntityType;
use crate::importer::classifier::classify;
use crate::importer::commit::ImportSession;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::normalizer::SchemaRowNormalizer;
use crate::importer::report::ImportReport;
use crate::importer::traits::{
    BatchImporter, FileParser, ReferenceSets, RowNormalizer, ValidatorEngine,
};
use crate::importer::validator::SchemaValidator;
use crate::schema::schema_for;
use crate::store::ImportStore;
use async_trait::async_trait;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument};

// ==========================================
// BatchImporterImpl
// ==========================================
pub struct BatchImporterImpl<S>
where
    S: ImportStore,
{
    store: S,
    config: ImportConfig,

    // pipeline components
    file_parser: Box<dyn FileParser>,
    normalizer: Box<dyn RowNormalizer>,
    validator: Box<dyn ValidatorEngine>,
}

impl<S> BatchImporterImpl<S>
where
    S: ImportStore,
{
    pub fn new(store: S, config: ImportConfig) -> Self {
        let normalizer = SchemaRowNormalizer::new(config.header_rows);
        Self {
            store,
            config,
            file_parser: Box::new(UniversalFileParser),
            normalizer: Box::new(normalizer),
            validator: Box::new(SchemaValidator::new()),
        }
    }

    pub fn with_components(
        store: S,
        config: ImportConfig,
        file_parser: Box<dyn FileParser>,
        normalizer: Box<dyn RowNormalizer>,
        validator: Box<dyn ValidatorEngine>,
    ) -> Self {
        Self {
            store,
            config,
            file_parser,
            normalizer,
            validator,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// One reference set per cross-reference rule, keyed by field
    /// name, taken from the store's existing keys for the referenced
    /// entity type.
    async fn fetch_reference_sets(&self, entity: EntityType) -> ImportResult<ReferenceSets> {
        let schema = schema_for(entity);
        let mut references = ReferenceSets::new();
        for rule in &schema.cross_refs {
            let keys = self
                .store
                .fetch_existing_keys(rule.references)
                .await
                .map_err(|e| ImportError::SnapshotFetchError(e.to_string()))?;
            references.insert(rule.field, keys);
        }
        Ok(references)
    }
}

#[async_trait]
impl<S> BatchImporter for BatchImporterImpl<S>
where
    S: ImportStore + Send + Sync,
{
    #[instrument(skip(self, rows), fields(entity = %entity))]
    async fn preview_rows(
        &self,
        entity: EntityType,
        rows: Vec<RawRow>,
    ) -> ImportResult<ImportSession> {
        let started = Instant::now();

        if rows.is_empty() {
            return Err(ImportError::EmptyInput);
        }
        if rows.len() > self.config.max_batch_rows {
            return Err(ImportError::BatchTooLarge {
                rows: rows.len(),
                cap: self.config.max_batch_rows,
            });
        }

        let schema = schema_for(entity);

        debug!("fetching existing-store snapshot");
        let existing = self
            .store
            .fetch_existing_keys(entity)
            .await
            .map_err(|e| ImportError::SnapshotFetchError(e.to_string()))?;
        let references = self.fetch_reference_sets(entity).await?;

        debug!(rows = rows.len(), "normalizing batch");
        let normalized = self.normalizer.normalize_batch(&rows, schema);

        debug!("validating batch");
        let validated = self
            .validator
            .validate_batch(schema, normalized, &existing, &references);

        let result = classify(validated);
        let session = ImportSession::new(entity, result);

        info!(
            batch_id = %session.batch_id,
            total = session.result.total_count,
            valid = session.result.valid_count(),
            invalid = session.result.invalid_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "preview complete"
        );

        Ok(session)
    }

    async fn preview_file<P: AsRef<Path> + Send>(
        &self,
        entity: EntityType,
        file_path: P,
    ) -> ImportResult<ImportSession> {
        let path = file_path.as_ref();
        info!(entity = %entity, file = %path.display(), "parsing import file");
        let rows = self.file_parser.parse(path)?;
        self.preview_rows(entity, rows).await
    }

    async fn commit(&self, session: &mut ImportSession) -> ImportResult<usize> {
        session.commit(&self.store).await
    }

    async fn import_files<P: AsRef<Path> + Send + Sync>(
        &self,
        entity: EntityType,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportReport, String>> {
        use futures::future::join_all;

        info!(entity = %entity, count = file_paths.len(), "importing files");

        let tasks = file_paths.into_iter().map(|path| {
            let path_display = path.as_ref().display().to_string();
            async move {
                let mut session = self
                    .preview_file(entity, path)
                    .await
                    .map_err(|e| format!("{}: {}", path_display, e))?;
                session
                    .commit(&self.store)
                    .await
                    .map_err(|e| format!("{}: {}", path_display, e))?;
                Ok(ImportReport::from_session(&session))
            }
        });

        let results = join_all(tasks).await;

        info!(
            total = results.len(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "file import finished"
        );

        results
    }
}
