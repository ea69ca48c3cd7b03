use chrono::{Local, Timelike};
use join_domain::summary::greeting;
use join_domain::BoardSummary;

use crate::context::CliContext;
use crate::output;

pub fn handle(ctx: &CliContext) -> anyhow::Result<()> {
    let summary = BoardSummary::from_grouped(ctx.coordinator.board());
    let hour = Local::now().hour();
    output::output_success(serde_json::json!({
        "greeting": greeting(hour),
        "summary": summary,
    }));
    Ok(())
}
