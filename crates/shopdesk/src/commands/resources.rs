//! Resource command handlers: catalog, list, get, create, update, delete.

use serde_json::Value;
use shopdesk_core::resource::{self, Capability, RESOURCES, ResourceDef};
use tabled::Tabled;

use crate::cli::{CreateArgs, DeleteArgs, GetArgs, GlobalOpts, ListArgs, OutputFormat, UpdateArgs};
use crate::error::CliError;
use crate::output;

use super::Console;
use super::util::{self, Spinner};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Label")]
    label: &'static str,
    #[tabled(rename = "Path")]
    path: &'static str,
    #[tabled(rename = "Operations")]
    operations: String,
}

impl From<&ResourceDef> for ResourceRow {
    fn from(r: &ResourceDef) -> Self {
        Self {
            name: r.name,
            label: r.label,
            path: r.path,
            operations: r
                .capabilities
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Look the resource up and check it supports `capability`.
fn resolve(name: &str, capability: Capability) -> Result<&'static ResourceDef, CliError> {
    let def = resource::lookup(name)?;
    def.require(capability)?;
    Ok(def)
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn catalog(global: &GlobalOpts) {
    let out = output::render_list(global.output, RESOURCES, |r| ResourceRow::from(r), |r| {
        r.name.to_owned()
    });
    output::print_output(&out, global.quiet);
}

pub async fn list(console: &Console, args: ListArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let def = resolve(&args.resource, Capability::List)?;
    let query = util::build_list_query(&args)?;
    console.require_session()?;

    let page = {
        let _spin = Spinner::start(&format!("Fetching {}", def.label), global.quiet);
        console
            .data
            .list::<Value>(def.path, &query)
            .await
            .map_err(|e| console.fail(e))?
    };

    output::print_output(&output::render_page(global.output, &page), global.quiet);
    if matches!(global.output, OutputFormat::Table) && !global.quiet {
        eprintln!("{} of {} {}", page.data.len(), page.total, def.name);
    }
    Ok(())
}

pub async fn get(console: &Console, args: GetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let def = resolve(&args.resource, Capability::Show)?;
    console.require_session()?;
    let spin = Spinner::start(&format!("Fetching {}", def.label), global.quiet);

    let out = if let [id] = args.ids.as_slice() {
        let record = console
            .data
            .get_one::<Value>(def.path, id)
            .await
            .map_err(|e| console.fail(e))?;
        output::render_record(global.output, &record.data)
    } else {
        let records = console
            .data
            .get_many::<Value>(def.path, &args.ids)
            .await
            .map_err(|e| console.fail(e))?;
        output::render_records(global.output, &records.data)
    };
    drop(spin);
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn create(console: &Console, args: CreateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let def = resolve(&args.resource, Capability::Create)?;
    let payload = util::read_payload(&args.payload)?;
    console.require_session()?;

    let created = console
        .data
        .create::<Value, _>(def.path, &payload)
        .await
        .map_err(|e| console.fail(e))?;

    output::print_output(&output::render_record(global.output, &created.data), global.quiet);
    if !global.quiet {
        eprintln!("✓ Created {}", def.name);
    }
    Ok(())
}

pub async fn update(console: &Console, args: UpdateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let def = resolve(&args.resource, Capability::Edit)?;
    let payload = util::read_payload(&args.payload)?;
    console.require_session()?;

    let updated = console
        .data
        .update::<Value, _>(def.path, &args.id, &payload)
        .await
        .map_err(|e| console.fail(e))?;

    output::print_output(&output::render_record(global.output, &updated.data), global.quiet);
    if !global.quiet {
        eprintln!("✓ Updated {} {}", def.name, args.id);
    }
    Ok(())
}

pub async fn delete(console: &Console, args: DeleteArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let def = resolve(&args.resource, Capability::Delete)?;
    console.require_session()?;
    if !util::confirm(
        &format!("Delete {} '{}'? This cannot be undone.", def.name, args.id),
        global.yes,
    )? {
        return Ok(());
    }

    let deleted = console
        .data
        .delete_one::<Value>(def.path, &args.id)
        .await
        .map_err(|e| console.fail(e))?;

    if !deleted.data.is_null() {
        output::print_output(&output::render_record(global.output, &deleted.data), global.quiet);
    }
    if !global.quiet {
        eprintln!("✓ Deleted {} {}", def.name, args.id);
    }
    Ok(())
}
