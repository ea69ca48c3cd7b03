use join_domain::contact::{color_for, initials};
use serde::Serialize;

use crate::cli::ContactAction;
use crate::context::CliContext;
use crate::output;

#[derive(Serialize)]
struct ContactRow {
    id: String,
    name: String,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    initials: String,
    color: &'static str,
}

pub async fn handle(ctx: &CliContext, action: ContactAction) -> anyhow::Result<()> {
    match action {
        ContactAction::List => {
            let contacts = ctx.contacts().await?;
            let rows: Vec<ContactRow> = contacts
                .iter()
                .map(|c| ContactRow {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    email: c.email.clone(),
                    phone: c.phone.clone(),
                    initials: initials(&c.name),
                    color: color_for(&c.name, &contacts),
                })
                .collect();
            output::output_list(rows);
        }
    }
    Ok(())
}
