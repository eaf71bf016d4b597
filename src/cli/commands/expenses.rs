use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{plain, section as output_section};
use crate::cli::table::{Table, TableColumn};
use crate::core::services::ExpenseService;
use crate::domain::Expense;
use crate::reports::format_money;

use super::{parse_date_or, parse_id, parse_number, require_args, CommandDefinition};

const GROUP: &str = "Expenses";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("expenses", GROUP, "List other expenses", "expenses", cmd_list),
        CommandDefinition::new(
            "expense-add",
            GROUP,
            "Record an expense",
            "expense-add <item> <amount> [date]",
            cmd_add,
        ),
        CommandDefinition::new(
            "expense-delete",
            GROUP,
            "Delete an expense",
            "expense-delete <id>",
            cmd_delete,
        ),
    ]
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let symbol = &context.config.currency_symbol;
    let mut table = Table::new(vec![
        TableColumn::right("Id"),
        TableColumn::left("Date"),
        TableColumn::left("Item").max_width(32),
        TableColumn::right("Amount"),
    ]);
    for expense in ExpenseService::list(context.store()) {
        table.push(vec![
            expense.id.to_string(),
            expense.date.to_string(),
            expense.item.clone(),
            format_money(symbol, expense.amount),
        ]);
    }
    if table.is_empty() {
        io::print_info("No expenses yet.");
        return Ok(());
    }
    output_section("Expenses");
    plain(table.render());
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 2, "expense-add <item> <amount> [date]")?;
    let amount = parse_number(args[1], "Amount")?;
    let date = parse_date_or(args.get(2), context.today())?;
    let expense = Expense::new(date, args[0], amount);
    let id = context.mutate(|store| ExpenseService::add(store, expense))?;
    io::print_success(format!("Expense {} added.", id));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    require_args(args, 1, "expense-delete <id>")?;
    let id = parse_id(args[0], "Expense id")?;
    if !context.confirm(&format!("Delete expense {}?", id))? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    context.mutate(|store| ExpenseService::remove(store, id))?;
    io::print_success(format!("Expense {} deleted.", id));
    Ok(())
}
