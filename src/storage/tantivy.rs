//! Tantivy-backed element store.
//!
//! Two on-disk indexes under one directory: `elements` holds one document
//! per symbol record (exact name term, reversed-name term, kind
//! discriminator, JSON payload), `completions` holds the tokenized
//! module-prefixed name strings with a priority fast field for autocomplete
//! ranking.
//!
//! Suffix lookups cannot use a plain prefix index over dotted names, so each
//! record also stores its lowercased, character-reversed name; a suffix query
//! becomes an indexed range scan with `reverse(lowercase(fragment))` as the
//! prefix. Reversed and forward name travel in the same document, so they
//! can never diverge.

use std::ops::Bound;
use std::path::{Path, PathBuf};

use tantivy::{
    DocId, Index, IndexReader, IndexSettings, ReloadPolicy, Score, SegmentReader,
    TantivyDocument as Document, Term,
    collector::{DocSetCollector, TopDocs},
    directory::MmapDirectory,
    query::{AllQuery, BooleanQuery, FuzzyTermQuery, Occur, Query, QueryParser, RangeQuery, TermQuery},
    schema::{FAST, Field, IndexRecordOption, STORED, STRING, Schema, SchemaBuilder, TEXT, Value},
};
use tracing::debug;

use crate::config::SearchConfig;
use crate::model::{Element, ElementKind, TypeRecord};
use crate::storage::{ElementStore, FetchError, FetchResult, StoreId};
use crate::types::QualifiedName;

/// Rows per commit during a bulk load. Keeps a very large corpus from
/// holding an unbounded uncommitted batch in memory.
const COMMIT_BATCH_ROWS: usize = 1_000;

const ELEMENT_WRITER_BUFFER: usize = 100_000_000;
const COMPLETION_WRITER_BUFFER: usize = 50_000_000;

/// Schema fields of the element index.
#[derive(Debug)]
struct ElementSchema {
    qualified_name: Field,
    reversed_name: Field,
    kind: Field,
    payload: Field,
}

impl ElementSchema {
    fn build() -> (Schema, ElementSchema) {
        let mut builder = SchemaBuilder::default();
        let qualified_name = builder.add_text_field("qualified_name", STRING | STORED);
        let reversed_name = builder.add_text_field("reversed_name", STRING);
        let kind = builder.add_text_field("kind", STRING | STORED);
        let payload = builder.add_text_field("payload", STORED);
        let schema = builder.build();
        (
            schema,
            ElementSchema {
                qualified_name,
                reversed_name,
                kind,
                payload,
            },
        )
    }
}

/// Schema fields of the completion index.
#[derive(Debug)]
struct CompletionSchema {
    qualified_name: Field,
    priority: Field,
}

impl CompletionSchema {
    fn build() -> (Schema, CompletionSchema) {
        let mut builder = SchemaBuilder::default();
        let qualified_name = builder.add_text_field("qualified_name", TEXT | STORED);
        let priority = builder.add_u64_field("priority", FAST | STORED);
        let schema = builder.build();
        (
            schema,
            CompletionSchema {
                qualified_name,
                priority,
            },
        )
    }
}

/// On-disk element store for one corpus.
pub struct TantivyStore {
    id: StoreId,
    path: PathBuf,
    elements: Index,
    elements_reader: IndexReader,
    element_schema: ElementSchema,
    completions: Index,
    completions_reader: IndexReader,
    completion_schema: CompletionSchema,
    search: SearchConfig,
    link_base: Option<String>,
}

impl std::fmt::Debug for TantivyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyStore")
            .field("id", &self.id)
            .field("path", &self.path)
            .finish()
    }
}

impl TantivyStore {
    /// Opens (or creates) the store under `path`.
    pub fn open(path: impl AsRef<Path>, id: StoreId) -> FetchResult<Self> {
        Self::with_search_config(path, id, SearchConfig::default())
    }

    /// Opens the store with explicit autocomplete settings.
    pub fn with_search_config(
        path: impl AsRef<Path>,
        id: StoreId,
        search: SearchConfig,
    ) -> FetchResult<Self> {
        let path = path.as_ref().to_path_buf();

        let (element_schema_def, element_schema) = ElementSchema::build();
        let (completion_schema_def, completion_schema) = CompletionSchema::build();

        let elements = open_or_create(&path.join("elements"), element_schema_def)?;
        let completions = open_or_create(&path.join("completions"), completion_schema_def)?;

        let elements_reader = elements
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        let completions_reader = completions
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        debug!(path = %path.display(), store = id.value(), "opened element store");

        Ok(Self {
            id,
            path,
            elements,
            elements_reader,
            element_schema,
            completions,
            completions_reader,
            completion_schema,
            search,
            link_base: None,
        })
    }

    /// Sets the base URL used when rendering links into this corpus's
    /// published documentation.
    pub fn with_link_base(mut self, link_base: impl Into<String>) -> Self {
        self.link_base = Some(link_base.into());
        self
    }

    /// Bulk-inserts `elements`, committing every [`COMMIT_BATCH_ROWS`] rows.
    ///
    /// There is no update path; the store is append-only after the initial
    /// load. Forward name, reversed name and payload are one document per
    /// record, so a partial batch never leaves them inconsistent.
    pub fn add_all(&self, elements: &[Element]) -> FetchResult<()> {
        let mut element_writer = self.elements.writer::<Document>(ELEMENT_WRITER_BUFFER)?;
        let mut completion_writer = self.completions.writer::<Document>(COMPLETION_WRITER_BUFFER)?;

        for (row, element) in elements.iter().enumerate() {
            element_writer.add_document(self.element_document(element)?)?;
            completion_writer.add_document(self.completion_document(element))?;

            if (row + 1) % COMMIT_BATCH_ROWS == 0 {
                element_writer.commit()?;
                completion_writer.commit()?;
                debug!(rows = row + 1, "committed bulk-load batch");
            }
        }

        element_writer.commit()?;
        completion_writer.commit()?;
        self.elements_reader.reload()?;
        self.completions_reader.reload()?;

        debug!(
            rows = elements.len(),
            path = %self.path.display(),
            "bulk load committed"
        );
        Ok(())
    }

    /// Number of stored elements.
    pub fn element_count(&self) -> u64 {
        self.elements_reader.searcher().num_docs()
    }

    /// The directory this store lives in.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn element_document(&self, element: &Element) -> FetchResult<Document> {
        let name = element.qualified_name();
        let payload = match element {
            Element::Type(record) => serde_json::to_string(record),
            Element::Method(record) => serde_json::to_string(record),
            Element::Field(record) => serde_json::to_string(record),
        }
        .map_err(|source| FetchError::Payload {
            name: name.as_str().to_string(),
            source,
        })?;

        let mut doc = Document::new();
        doc.add_text(self.element_schema.qualified_name, name.as_str());
        doc.add_text(self.element_schema.reversed_name, reversed_key(element));
        doc.add_text(self.element_schema.kind, element.kind().as_str());
        doc.add_text(self.element_schema.payload, payload);
        Ok(doc)
    }

    fn completion_document(&self, element: &Element) -> Document {
        let priority = match element {
            Element::Type(_) => self.search.type_priority,
            _ => self.search.member_priority,
        };

        let mut doc = Document::new();
        doc.add_text(
            self.completion_schema.qualified_name,
            element.qualified_name().as_string_with_module(),
        );
        doc.add_u64(self.completion_schema.priority, priority);
        doc
    }

    fn decode_element(&self, doc: &Document) -> FetchResult<Element> {
        let name = doc
            .get_first(self.element_schema.qualified_name)
            .and_then(|v| v.as_str())
            .ok_or(FetchError::MissingField("qualified_name"))?;
        let kind = doc
            .get_first(self.element_schema.kind)
            .and_then(|v| v.as_str())
            .ok_or(FetchError::MissingField("kind"))?;
        let payload = doc
            .get_first(self.element_schema.payload)
            .and_then(|v| v.as_str())
            .ok_or(FetchError::MissingField("payload"))?;

        let decode_payload = |source: serde_json::Error| FetchError::Payload {
            name: name.to_string(),
            source,
        };

        match ElementKind::parse(kind) {
            Some(ElementKind::Type) => Ok(Element::Type(
                serde_json::from_str(payload).map_err(decode_payload)?,
            )),
            Some(ElementKind::Method) => Ok(Element::Method(
                serde_json::from_str(payload).map_err(decode_payload)?,
            )),
            Some(ElementKind::Field) => Ok(Element::Field(
                serde_json::from_str(payload).map_err(decode_payload)?,
            )),
            None => Err(FetchError::UnknownKind {
                name: name.to_string(),
                kind: kind.to_string(),
            }),
        }
    }

    fn search_elements(&self, query: &dyn Query) -> FetchResult<Vec<Element>> {
        let searcher = self.elements_reader.searcher();
        let mut addresses: Vec<_> = searcher
            .search(query, &DocSetCollector)?
            .into_iter()
            .collect();
        // DocSetCollector yields a set; sort for a stable scan order.
        addresses.sort();

        let mut results = Vec::with_capacity(addresses.len());
        for address in addresses {
            let doc: Document = searcher.doc(address)?;
            results.push(self.decode_element(&doc)?);
        }
        Ok(results)
    }

    /// Indexed range scan equivalent to "reversed_name starts with `prefix`".
    fn reversed_prefix_query(&self, prefix: &str) -> RangeQuery {
        let lower = Term::from_field_text(self.element_schema.reversed_name, prefix);
        let mut upper_text = prefix.to_string();
        upper_text.push(char::MAX);
        let upper = Term::from_field_text(self.element_schema.reversed_name, &upper_text);
        RangeQuery::new(Bound::Included(lower), Bound::Excluded(upper))
    }
}

impl ElementStore for TantivyStore {
    fn id(&self) -> StoreId {
        self.id
    }

    fn find_all(&self) -> FetchResult<Vec<Element>> {
        self.search_elements(&AllQuery)
    }

    fn find_type_by_name(&self, fragment: &str) -> FetchResult<Vec<TypeRecord>> {
        let fragment_lower = fragment.to_lowercase();
        let range = self.reversed_prefix_query(&reverse(&fragment_lower));
        let kind_term = TermQuery::new(
            Term::from_field_text(self.element_schema.kind, ElementKind::Type.as_str()),
            IndexRecordOption::Basic,
        );
        let query = BooleanQuery::new(vec![
            (Occur::Must, Box::new(range) as Box<dyn Query>),
            (Occur::Must, Box::new(kind_term)),
        ]);

        let mut results = Vec::new();
        for element in self.search_elements(&query)? {
            if let Element::Type(record) = element {
                // The reversed index also surfaces non-segment-aligned
                // suffixes ("ame" for "Name"); keep only aligned ones.
                if suffix_matches_segments(record.name.as_str(), &fragment_lower) {
                    results.push(record);
                }
            }
        }
        Ok(results)
    }

    fn find_element_by_name(&self, fragment: &str) -> FetchResult<Vec<Element>> {
        let query = self.reversed_prefix_query(&reverse(&fragment.to_lowercase()));
        Ok(self
            .search_elements(&query)?
            .into_iter()
            .filter(|element| !matches!(element, Element::Type(_)))
            .collect())
    }

    fn find_by_qualified_name(&self, name: &QualifiedName) -> FetchResult<Vec<Element>> {
        let term = Term::from_field_text(self.element_schema.qualified_name, name.as_str());
        let query = TermQuery::new(term, IndexRecordOption::Basic);
        self.search_elements(&query)
    }

    fn autocomplete(&self, prompt: &str) -> FetchResult<Vec<String>> {
        let searcher = self.completions_reader.searcher();

        let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();

        let mut parser = QueryParser::for_index(
            &self.completions,
            vec![self.completion_schema.qualified_name],
        );
        parser.set_conjunction_by_default();
        if let Ok(parsed) = parser.parse_query(prompt) {
            clauses.push((Occur::Should, parsed));
        }

        // Typo tolerance on the prompt as a single token.
        let fuzzy_term = Term::from_field_text(
            self.completion_schema.qualified_name,
            &prompt.to_lowercase(),
        );
        clauses.push((Occur::Should, Box::new(FuzzyTermQuery::new(fuzzy_term, 1, true))));

        let query = BooleanQuery::new(clauses);

        let collector = TopDocs::with_limit(self.search.completion_limit).tweak_score(
            move |segment_reader: &SegmentReader| {
                let priority = segment_reader
                    .fast_fields()
                    .u64("priority")
                    .expect("completion schema declares a priority fast field")
                    .first_or_default_col(0);
                move |doc: DocId, score: Score| (priority.get_val(doc), score)
            },
        );

        let top = searcher.search(&query, &collector)?;
        let mut results = Vec::with_capacity(top.len());
        for (_rank, address) in top {
            let doc: Document = searcher.doc(address)?;
            let name = doc
                .get_first(self.completion_schema.qualified_name)
                .and_then(|v| v.as_str())
                .ok_or(FetchError::MissingField("qualified_name"))?;
            results.push(name.to_string());
        }
        Ok(results)
    }

    fn link_base(&self) -> Option<&str> {
        self.link_base.as_deref()
    }
}

fn open_or_create(dir: &Path, schema: Schema) -> FetchResult<Index> {
    std::fs::create_dir_all(dir)?;
    if dir.join("meta.json").exists() {
        Ok(Index::open_in_dir(dir)?)
    } else {
        let mmap = MmapDirectory::open(dir)?;
        Ok(Index::create(mmap, schema, IndexSettings::default())?)
    }
}

fn reverse(value: &str) -> String {
    value.chars().rev().collect()
}

/// Reversed index key: full name for types, simple name for members, both
/// lowercased for case-insensitive prefix scans.
fn reversed_key(element: &Element) -> String {
    let source = match element {
        Element::Type(record) => record.name.as_str(),
        _ => element.qualified_name().simple_name(),
    };
    reverse(&source.to_lowercase())
}

/// Whether `fragment_lower` anchors at the end of `name` on dot-segment
/// boundaries.
fn suffix_matches_segments(name: &str, fragment_lower: &str) -> bool {
    let name_lower = name.to_lowercase();
    if fragment_lower.starts_with('.') {
        return name_lower.ends_with(fragment_lower);
    }
    name_lower == fragment_lower || name_lower.ends_with(&format!(".{fragment_lower}"))
}
