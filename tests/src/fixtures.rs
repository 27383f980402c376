//! A small document store shared by the test suites.
//!
//! | Document | title      | owner | team |
//! |----------|------------|-------|------|
//! | 1        | Parsing    | 1     | 10   |
//! | 2        | Codegen    | 2     | 10   |
//! | 3        | Linking    | 1     | 10   |
//! | 4        | Scheduling | 4     | 20   |

use correlate::{
    provider::{self, CorrelationProvider},
    stmt::{Alias, Expr, OrderByExpr, Query},
    CorrelatedAttribute, ContainerKind, Value, ViewContext, ViewType,
};
use correlate_driver_memory::Memory;

/// Columns of the rows produced by [`documents`].
pub mod slot {
    pub const ID: usize = 0;
    pub const TITLE: usize = 1;
    pub const OWNER: usize = 2;
    pub const TEAM: usize = 3;
    pub const TAGS: usize = 4;
    pub const TRANSLATIONS: usize = 5;
    pub const TEAM_DOCUMENTS: usize = 6;
}

pub fn memory() -> Memory {
    let mut memory = Memory::new();

    memory
        .table("Person", ["id", "name", "team_id"])
        .insert("Person", [Value::I64(1), "Ada".into(), Value::I64(10)])
        .insert("Person", [Value::I64(2), "Grace".into(), Value::I64(10)])
        .insert("Person", [Value::I64(4), "Linus".into(), Value::I64(20)]);

    memory
        .table("Team", ["id", "name"])
        .insert("Team", [Value::I64(10), "Compilers".into()])
        .insert("Team", [Value::I64(20), "Kernels".into()]);

    memory
        .table("Document", ["id", "title", "owner_id", "team_id"])
        .insert(
            "Document",
            [Value::I64(1), "Parsing".into(), Value::I64(1), Value::I64(10)],
        )
        .insert(
            "Document",
            [Value::I64(2), "Codegen".into(), Value::I64(2), Value::I64(10)],
        )
        .insert(
            "Document",
            [Value::I64(3), "Linking".into(), Value::I64(1), Value::I64(10)],
        )
        .insert(
            "Document",
            [Value::I64(4), "Scheduling".into(), Value::I64(4), Value::I64(20)],
        );

    memory
        .table("Tag", ["id", "document_id", "name"])
        .insert("Tag", [Value::I64(1), Value::I64(1), "rust".into()])
        .insert("Tag", [Value::I64(2), Value::I64(1), Value::Null])
        .insert("Tag", [Value::I64(3), Value::I64(1), "compilers".into()])
        .insert("Tag", [Value::I64(4), Value::I64(2), "llvm".into()])
        .insert("Tag", [Value::I64(5), Value::I64(2), "llvm".into()]);

    memory
        .table("Translation", ["id", "document_id", "locale", "text"])
        .insert(
            "Translation",
            [Value::I64(1), Value::I64(1), "en".into(), "Parsing".into()],
        )
        .insert(
            "Translation",
            [Value::I64(2), Value::I64(1), "de".into(), "Parsen".into()],
        )
        .insert(
            "Translation",
            [Value::I64(3), Value::I64(1), Value::Null, "orphan".into()],
        );

    memory
}

/// All documents in id order. Each correlated attribute of the view has its
/// own basis column.
pub fn documents() -> Query {
    let d = Alias::new("d");

    Query::from_table("Document", d.clone())
        .order_by(OrderByExpr::asc(d.field("id")))
        .select([
            d.field("id"),
            d.field("title"),
            d.field("owner_id"),
            d.field("team_id"),
            d.field("id"),
            d.field("id"),
            d.field("team_id"),
        ])
}

pub fn document_view() -> ViewContext {
    ViewContext::new(ViewType::new("DocumentView", "d").id("id", slot::ID)).primary(documents())
}

/// Correlates `entity` rows whose `field` equals the basis.
pub fn equals(name: &str, entity: &str, field: &str) -> impl CorrelationProvider {
    let entity = entity.to_string();
    let field = field.to_string();

    provider::from_fn(name, move |builder, basis| {
        let correlated = builder.correlate(entity.as_str())?;
        builder.on(Expr::eq(correlated.field(field.as_str()), basis));
        Ok(())
    })
}

/// The other documents of the basis team, excluding the view root.
pub fn other_team_documents() -> impl CorrelationProvider {
    provider::from_fn("TeamDocumentsProvider", |builder, basis| {
        let document = builder.correlate("Document")?;
        let root = builder.view_root();
        builder
            .on(Expr::eq(document.field("team_id"), basis))
            .on(Expr::ne(document.field("id"), root));
        Ok(())
    })
}

pub fn owner() -> CorrelatedAttribute {
    CorrelatedAttribute::new(
        "DocumentView.owner",
        slot::OWNER,
        equals("OwnerProvider", "Person", "id"),
    )
    .basis(Expr::path("d", "owner_id"))
    .result("name")
}

pub fn team_name() -> CorrelatedAttribute {
    CorrelatedAttribute::new(
        "DocumentView.teamName",
        slot::TEAM,
        equals("TeamProvider", "Team", "id"),
    )
    .basis(Expr::path("d", "team_id"))
    .result("name")
}

pub fn tags() -> CorrelatedAttribute {
    CorrelatedAttribute::new(
        "DocumentView.tags",
        slot::TAGS,
        equals("TagsProvider", "Tag", "document_id"),
    )
    .basis(Expr::path("d", "id"))
    .result("name")
    .container(ContainerKind::List)
}

pub fn translations() -> CorrelatedAttribute {
    CorrelatedAttribute::new(
        "DocumentView.translations",
        slot::TRANSLATIONS,
        equals("TranslationsProvider", "Translation", "document_id"),
    )
    .basis(Expr::path("d", "id"))
    .result("text")
    .index("locale")
}

pub fn team_documents() -> CorrelatedAttribute {
    CorrelatedAttribute::new(
        "DocumentView.teamDocuments",
        slot::TEAM_DOCUMENTS,
        other_team_documents(),
    )
    .basis(Expr::path("d", "team_id"))
    .result("title")
    .container(ContainerKind::List)
}

/// String list helper for assertions
pub fn strings(items: &[&str]) -> Value {
    Value::List(items.iter().map(|item| Value::from(*item)).collect())
}
