
use super::{DocumentIndex, EntryMetadata, IndexedEntry, SearchHit};
use crate::config::Config;
use crate::{ApidexError, Result};
use arrow::array::{Array, FixedSizeListArray, Float32Array, RecordBatchIterator, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use futures::TryStreamExt;
use itertools::Itertools;
use lancedb::{
    Connection,
    query::{ExecutableQuery, QueryBase, Select},
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Persistent vector index backed by LanceDB on local disk.
pub struct VectorStore {
    connection: Connection,
    table_name: String,
    dimension: usize,
}

impl VectorStore {
    /// Connect to the store under the configured base directory, creating
    /// the table on first use.
    ///
    /// Existence is checked explicitly against the table listing, so a
    /// connection failure surfaces as a store error instead of being
    /// mistaken for "table does not exist yet".
    #[inline]
    pub async fn open(config: &Config) -> Result<Self> {
        let db_path = config.vectors_path();
        debug!("Opening LanceDB at path: {:?}", db_path);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApidexError::Store(format!("Failed to create vector store directory: {}", e))
            })?;
        }

        let uri = format!("file://{}", db_path.display());
        let connection = lancedb::connect(&uri)
            .execute()
            .await
            .map_err(|e| ApidexError::Store(format!("Failed to connect to LanceDB: {}", e)))?;

        let store = Self {
            connection,
            table_name: config.store.table.clone(),
            dimension: config.ollama.embedding_dimension as usize,
        };

        store.ensure_table().await?;
        Ok(store)
    }

    async fn ensure_table(&self) -> Result<()> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| ApidexError::Store(format!("Failed to list tables: {}", e)))?;

        if table_names.contains(&self.table_name) {
            debug!("Opening existing table {}", self.table_name);
            return Ok(());
        }

        info!(
            "Creating table {} with dimension {}",
            self.table_name, self.dimension
        );
        self.connection
            .create_empty_table(&self.table_name, self.schema())
            .execute()
            .await
            .map_err(|e| ApidexError::Store(format!("Failed to create table: {}", e)))?;

        Ok(())
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, false)),
                    self.dimension as i32,
                ),
                false,
            ),
            Field::new("document", DataType::Utf8, false),
            Field::new("full_name", DataType::Utf8, false),
            Field::new("module", DataType::Utf8, false),
            Field::new("class_name", DataType::Utf8, false),
            Field::new("link", DataType::Utf8, false),
            Field::new("signature", DataType::Utf8, false),
            Field::new("created_at", DataType::Utf8, false),
        ]))
    }

    async fn open_table(&self) -> Result<lancedb::Table> {
        self.connection
            .open_table(&self.table_name)
            .execute()
            .await
            .map_err(|e| ApidexError::Store(format!("Failed to open table: {}", e)))
    }

    fn record_batch(&self, entries: &[IndexedEntry]) -> Result<RecordBatch> {
        let len = entries.len();

        let mut ids = Vec::with_capacity(len);
        let mut documents = Vec::with_capacity(len);
        let mut full_names = Vec::with_capacity(len);
        let mut modules = Vec::with_capacity(len);
        let mut class_names = Vec::with_capacity(len);
        let mut links = Vec::with_capacity(len);
        let mut signatures = Vec::with_capacity(len);
        let mut created_ats = Vec::with_capacity(len);
        let mut flat_values = Vec::with_capacity(len * self.dimension);

        for entry in entries {
            if entry.vector.len() != self.dimension {
                return Err(ApidexError::Store(format!(
                    "Vector for id {} has {} dimensions, table expects {}",
                    entry.id,
                    entry.vector.len(),
                    self.dimension
                )));
            }

            ids.push(entry.id.as_str());
            documents.push(entry.document.as_str());
            full_names.push(entry.metadata.full_name.as_str());
            modules.push(entry.metadata.module.as_str());
            class_names.push(entry.metadata.class_name.as_str());
            links.push(entry.metadata.link.as_str());
            signatures.push(entry.metadata.signature.as_str());
            created_ats.push(entry.metadata.created_at.as_str());
            flat_values.extend_from_slice(&entry.vector);
        }

        let item_field = Arc::new(Field::new("item", DataType::Float32, false));
        let vector_array = FixedSizeListArray::try_new(
            item_field,
            self.dimension as i32,
            Arc::new(Float32Array::from(flat_values)),
            None,
        )
        .map_err(|e| ApidexError::Store(format!("Failed to create vector array: {}", e)))?;

        let arrays: Vec<Arc<dyn Array>> = vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(vector_array),
            Arc::new(StringArray::from(documents)),
            Arc::new(StringArray::from(full_names)),
            Arc::new(StringArray::from(modules)),
            Arc::new(StringArray::from(class_names)),
            Arc::new(StringArray::from(links)),
            Arc::new(StringArray::from(signatures)),
            Arc::new(StringArray::from(created_ats)),
        ];

        RecordBatch::try_new(self.schema(), arrays)
            .map_err(|e| ApidexError::Store(format!("Failed to create record batch: {}", e)))
    }

    fn parse_hit_batch(batch: &RecordBatch) -> Result<Vec<SearchHit>> {
        let ids = string_column(batch, "id")?;
        let documents = string_column(batch, "document")?;
        let full_names = string_column(batch, "full_name")?;
        let modules = string_column(batch, "module")?;
        let class_names = string_column(batch, "class_name")?;
        let links = string_column(batch, "link")?;
        let signatures = string_column(batch, "signature")?;
        let created_ats = string_column(batch, "created_at")?;

        let distances = batch
            .column_by_name("_distance")
            .map(|col| col.as_any().downcast_ref::<Float32Array>());

        let mut hits = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let distance = distances
                .flatten()
                .map_or(0.0, |d| if d.is_null(row) { 0.0 } else { d.value(row) });

            hits.push(SearchHit {
                id: ids.value(row).to_string(),
                document: documents.value(row).to_string(),
                metadata: EntryMetadata {
                    full_name: full_names.value(row).to_string(),
                    module: modules.value(row).to_string(),
                    class_name: class_names.value(row).to_string(),
                    link: links.value(row).to_string(),
                    signature: signatures.value(row).to_string(),
                    created_at: created_ats.value(row).to_string(),
                },
                distance,
            });
        }

        Ok(hits)
    }
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| ApidexError::Store(format!("Missing {} column", name)))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| ApidexError::Store(format!("Invalid {} column type", name)))
}

fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

#[async_trait]
impl DocumentIndex for VectorStore {
    async fn existing_ids(&self, ids: &[String]) -> Result<HashSet<String>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let table = self.open_table().await?;
        let predicate = format!(
            "id IN ({})",
            ids.iter()
                .map(|id| format!("'{}'", escape_literal(id)))
                .join(", ")
        );

        let mut stream = table
            .query()
            .only_if(predicate)
            .select(Select::Columns(vec!["id".to_string()]))
            .limit(ids.len())
            .execute()
            .await
            .map_err(|e| ApidexError::Store(format!("Failed to query existing ids: {}", e)))?;

        let mut present = HashSet::new();
        while let Some(batch) = stream
            .try_next()
            .await
            .map_err(|e| ApidexError::Store(format!("Failed to read id stream: {}", e)))?
        {
            let id_column = string_column(&batch, "id")?;
            for row in 0..batch.num_rows() {
                present.insert(id_column.value(row).to_string());
            }
        }

        debug!("{} of {} candidate ids already present", present.len(), ids.len());
        Ok(present)
    }

    async fn add(&mut self, entries: Vec<IndexedEntry>) -> Result<()> {
        if entries.is_empty() {
            debug!("No entries to store");
            return Ok(());
        }

        let batch = self.record_batch(&entries)?;
        let table = self.open_table().await?;

        let schema = batch.schema();
        let reader = RecordBatchIterator::new(std::iter::once(Ok(batch)), schema);
        table
            .add(reader)
            .execute()
            .await
            .map_err(|e| ApidexError::Store(format!("Failed to insert entries: {}", e)))?;

        info!("Stored {} entries", entries.len());
        Ok(())
    }

    async fn query(&self, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
        debug!("Searching for nearest vectors with limit: {}", limit);

        let table = self.open_table().await?;
        let mut stream = table
            .vector_search(vector)
            .map_err(|e| ApidexError::Store(format!("Failed to create vector search: {}", e)))?
            .column("vector")
            .limit(limit)
            .execute()
            .await
            .map_err(|e| ApidexError::Store(format!("Failed to execute search: {}", e)))?;

        let mut hits = Vec::new();
        while let Some(batch) = stream
            .try_next()
            .await
            .map_err(|e| ApidexError::Store(format!("Failed to read result stream: {}", e)))?
        {
            hits.extend(Self::parse_hit_batch(&batch)?);
        }

        debug!("Parsed {} search hits", hits.len());
        Ok(hits)
    }

    async fn count(&self) -> Result<u64> {
        let table = self.open_table().await?;
        let count = table
            .count_rows(None)
            .await
            .map_err(|e| ApidexError::Store(format!("Failed to count rows: {}", e)))?;

        Ok(count as u64)
    }
}
