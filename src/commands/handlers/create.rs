//! `create` handler: quick create from flags, or a guided question chain.

use async_trait::async_trait;
use tracing::info;

use super::{entity_kind, HandlerContext};
use crate::commands::prompt::{Continuation, Question, Step};
use crate::commands::schema::{self, EntityKind, FieldDef, FieldValues, PARENT, TITLE};
use crate::commands::tokenizer::ParsedCommand;
use crate::commands::validator::CREATE_SWITCHES;
use crate::error::Result;
use crate::store::NewRecord;

/// Handle `create <entity> [title] [field:value]... [--guided]`.
pub async fn handle_create(cmd: &ParsedCommand, ctx: &mut HandlerContext<'_>) -> Result<Step> {
    let kind = entity_kind(cmd)?;

    let mut fields = schema::collect_fields(kind, &cmd.flags, CREATE_SWITCHES)?;
    if let Some(target) = &cmd.target {
        fields.entry(TITLE).or_insert_with(|| target.clone());
    }
    fields.retain(|_, value| !value.is_empty());

    let default_parent = ctx.session.default_parent(kind).map(str::to_string);
    let has_title = fields.contains_key(TITLE);
    let has_parent =
        !kind.requires_parent() || fields.contains_key(PARENT) || default_parent.is_some();

    if has_title && has_parent && !cmd.has_switch("guided") {
        if kind.requires_parent() && !fields.contains_key(PARENT) {
            if let Some(parent) = default_parent {
                fields.insert(PARENT, parent);
            }
        }
        return create_record(kind, &fields, ctx).await;
    }

    info!("Starting guided create for {}", kind);
    GuidedCreate {
        kind,
        fields,
        default_parent,
        index: 0,
    }
    .next_step(ctx)
    .await
}

/// Builds the record, stores it once and reports the new id.
async fn create_record(
    kind: EntityKind,
    fields: &FieldValues,
    ctx: &mut HandlerContext<'_>,
) -> Result<Step> {
    let record = NewRecord::from_fields(kind, fields);
    let title = record.title.clone();

    let id = ctx.store.create(record).await?;
    info!("Created {} {}", kind, id);

    ctx.say(format!("Created {} '{}' (id: {})", kind, title, id));
    ctx.notifier.data_changed(kind);
    Ok(Step::Done)
}

/// Asks for each missing field in schema order, then creates the record.
struct GuidedCreate {
    kind: EntityKind,
    fields: FieldValues,
    default_parent: Option<String>,
    /// Index into the schema of the field being asked.
    index: usize,
}

impl GuidedCreate {
    async fn next_step(mut self, ctx: &mut HandlerContext<'_>) -> Result<Step> {
        let schema = self.kind.fields();
        while let Some(field) = schema.get(self.index) {
            if !self.fields.contains_key(field.name) {
                let question = self.question(field);
                return Ok(Step::ask(question, self));
            }
            self.index += 1;
        }

        create_record(self.kind, &self.fields, ctx).await
    }

    fn question(&self, field: &FieldDef) -> Question {
        let label = match field.hint() {
            Some(hint) => format!("{} ({})", field.label, hint),
            None => field.label.to_string(),
        };

        match (field.name, &self.default_parent) {
            (PARENT, Some(default)) => Question::required(label).with_default(default.clone()),
            _ if field.required => Question::required(label),
            _ => Question::optional(label),
        }
    }
}

#[async_trait]
impl Continuation for GuidedCreate {
    async fn resume(self: Box<Self>, answer: String, ctx: &mut HandlerContext<'_>) -> Result<Step> {
        let mut this = *self;
        let Some(field) = this.kind.fields().get(this.index) else {
            return this.next_step(ctx).await;
        };

        if !answer.is_empty() {
            match field.check(&answer) {
                Ok(value) => {
                    this.fields.insert(field.name, value);
                }
                Err(err) => {
                    ctx.say(&err.message);
                    let question = this.question(field);
                    return Ok(Step::ask(question, this));
                }
            }
        }

        this.index += 1;
        this.next_step(ctx).await
    }
}
