// Flattener: hierarchy -> ordered document records
// Traversal order determines id assignment, so this must stay deterministic


use tracing::debug;

use crate::reference::ApiReference;

/// Flat document record driving one vector-store upsert.
///
/// `id` is the zero-based flattening counter rendered as a string. It is
/// stable across runs only while the source hierarchy keeps its order.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiDocument {
    pub id: String,
    pub full_name: String,
    pub module: String,
    pub class_name: String,
    pub link: String,
    pub signature: String,
    pub example_code: String,
    /// Derived text submitted to the embedding model. Fixed field order and
    /// labels: identical input must produce identical text.
    pub embedding_text: String,
}

/// Flatten the reference into document records, sections first, then
/// subsections within each section, both in map iteration order.
#[inline]
pub fn flatten(reference: &ApiReference) -> Vec<ApiDocument> {
    let mut documents = Vec::with_capacity(reference.entry_count());
    let mut next_id = 0usize;

    for (module, section) in &reference.sections {
        for (class_name, entry) in &section.subsections {
            documents.push(ApiDocument {
                id: next_id.to_string(),
                full_name: format!("{}.{}", module, class_name),
                module: module.clone(),
                class_name: class_name.clone(),
                link: entry.link.clone(),
                signature: entry.class_signature.clone(),
                example_code: entry.example_code.clone(),
                embedding_text: build_embedding_text(
                    class_name,
                    module,
                    &entry.class_signature,
                    &entry.example_code,
                ),
            });
            next_id += 1;
        }
    }

    debug!("Flattened {} documents", documents.len());
    documents
}

fn build_embedding_text(class_name: &str, module: &str, signature: &str, example: &str) -> String {
    format!(
        "API Name: {}. Belongs to module: {}. Signature: {}. Example Usage: {}",
        class_name, module, signature, example
    )
}
