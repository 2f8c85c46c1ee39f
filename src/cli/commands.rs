use std::fs::File;

use chrono::{Local, NaiveDate};

use crate::cashback::CapStatus;
use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext, COMMANDS};
use crate::cli::table::{Table, TableColumn};
use crate::cli::{forms, output};
use crate::core::services::{
    AccountService, CashbackService, DebtService, PersonService, TransactionService,
};
use crate::currency::{format_currency_value, format_percent};
use crate::import::{import_csv, CsvCollection};
use crate::utils::build_info;

pub fn handle(
    context: &mut ShellContext,
    command: &str,
    args: &[&str],
) -> Result<LoopControl, CliError> {
    match command {
        "help" => help(),
        "version" => version(),
        "new" => new_book(context, args),
        "open" => open_book(context, args),
        "books" => list_books(context),
        "save" => save(context),
        "backup" => backup(context, args),
        "backups" => backups(context),
        "accounts" => accounts(context),
        "people" => people(context),
        "transactions" => transactions(context, args),
        "debt" => debt(context),
        "cashback" => cashback(context, args),
        "add" => add(context),
        "import" => import(context, args),
        "recompute" => recompute(context),
        "rebuild-debts" => rebuild_debts(context),
        "rebuild-cashback" => rebuild_cashback(context),
        "exit" => return Ok(LoopControl::Exit),
        other => {
            output::error(format!("Unknown command `{}`.", other));
            Ok(())
        }
    }?;
    Ok(LoopControl::Continue)
}

fn money(context: &ShellContext, amount: i64) -> String {
    format_currency_value(&context.locale, amount, &context.currency)
}

fn help() -> Result<(), CliError> {
    output::section("Commands");
    let mut table = Table::new(vec![TableColumn::left("Usage"), TableColumn::left("Summary")]);
    for spec in COMMANDS.iter() {
        table.push_row(vec![spec.usage.to_string(), spec.summary.to_string()]);
    }
    for line in table.render() {
        output::info(line);
    }
    Ok(())
}

fn version() -> Result<(), CliError> {
    let build = build_info::current();
    output::info(format!(
        "moneyflow_cli {} ({} {}, {} {}, {})",
        build.version, build.git_hash, build.git_status, build.profile, build.target, build.rustc
    ));
    Ok(())
}

fn new_book(context: &mut ShellContext, args: &[&str]) -> Result<(), CliError> {
    let name = args
        .first()
        .ok_or_else(|| CliError::Input("usage: new <name>".into()))?;
    context.manager.create(name)?;
    context.record_last_opened_config()?;
    output::success(format!("Created book `{}`.", name));
    Ok(())
}

fn open_book(context: &mut ShellContext, args: &[&str]) -> Result<(), CliError> {
    let name = args
        .first()
        .ok_or_else(|| CliError::Input("usage: open <name>".into()))?;
    let metadata = context.manager.load(name)?;
    context.record_last_opened_config()?;
    output::success(format!("Opened book `{}`.", metadata.name));
    for warning in &metadata.warnings {
        output::warning(warning);
    }
    Ok(())
}

fn list_books(context: &ShellContext) -> Result<(), CliError> {
    let books = context.manager.list_books()?;
    if books.is_empty() {
        output::info("No books stored yet; `new <name>` creates one.");
        return Ok(());
    }
    for name in books {
        output::info(name);
    }
    Ok(())
}

fn save(context: &mut ShellContext) -> Result<(), CliError> {
    context.manager.save()?;
    output::success("Book saved.");
    Ok(())
}

fn backup(context: &mut ShellContext, args: &[&str]) -> Result<(), CliError> {
    let note = args.first().copied();
    context.manager.backup(note)?;
    output::success("Backup created.");
    Ok(())
}

fn backups(context: &ShellContext) -> Result<(), CliError> {
    let name = context
        .manager
        .current_name()
        .ok_or_else(|| CliError::Command("no book open".into()))?;
    let backups = context.manager.list_backups(name)?;
    if backups.is_empty() {
        output::info("No backups yet.");
        return Ok(());
    }
    for backup in backups {
        output::info(backup);
    }
    Ok(())
}

fn accounts(context: &ShellContext) -> Result<(), CliError> {
    let book = context.manager.book()?;
    let mut table = Table::new(vec![
        TableColumn::left("Account"),
        TableColumn::left("Kind"),
        TableColumn::right("Balance"),
        TableColumn::right("Credit Limit"),
        TableColumn::left("Status"),
    ]);
    for account in AccountService::list(book) {
        table.push_row(vec![
            account.name.clone(),
            format!("{:?}", account.kind),
            money(context, account.current_balance),
            account
                .credit_limit
                .map(|limit| money(context, limit))
                .unwrap_or_else(|| "-".into()),
            if account.is_active { "active" } else { "inactive" }.into(),
        ]);
    }
    if table.is_empty() {
        output::info("No accounts in this book.");
        return Ok(());
    }
    for line in table.render() {
        output::info(line);
    }
    Ok(())
}

fn people(context: &ShellContext) -> Result<(), CliError> {
    let book = context.manager.book()?;
    let people = PersonService::list(book);
    if people.is_empty() {
        output::info("No people in this book.");
        return Ok(());
    }
    for person in people {
        output::info(format!("{}  {}", person.id, person.name));
    }
    Ok(())
}

fn transactions(context: &ShellContext, args: &[&str]) -> Result<(), CliError> {
    let limit = match args.first() {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| CliError::Input(format!("invalid limit `{}`", raw)))?,
        None => 20,
    };
    let book = context.manager.book()?;
    let mut table = Table::new(vec![
        TableColumn::left("Date"),
        TableColumn::left("Notes"),
        TableColumn::left("From"),
        TableColumn::left("To"),
        TableColumn::right("Amount"),
        TableColumn::right("Discount"),
        TableColumn::right("Final"),
    ]);
    for txn in TransactionService::recent(book, limit) {
        let discount = if txn.discount_value() > 0 {
            money(context, txn.discount_value())
        } else {
            "-".into()
        };
        table.push_row(vec![
            txn.date.to_string(),
            txn.notes.clone().unwrap_or_default(),
            txn.from_account.clone().unwrap_or_default(),
            txn.to_account.clone().unwrap_or_default(),
            money(context, txn.amount),
            discount,
            money(context, txn.final_price),
        ]);
    }
    if table.is_empty() {
        output::info("No transactions recorded.");
        return Ok(());
    }
    for line in table.render() {
        output::info(line);
    }
    Ok(())
}

fn debt(context: &ShellContext) -> Result<(), CliError> {
    let book = context.manager.book()?;
    let rows = DebtService::report(book);
    if rows.is_empty() {
        output::info("Debt ledger is empty; `rebuild-debts` derives it from transactions.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Period"),
        TableColumn::left("Person"),
        TableColumn::right("Debt"),
        TableColumn::right("Repaid"),
        TableColumn::right("Remaining"),
        TableColumn::left("Status"),
    ]);
    for row in rows {
        table.push_row(vec![
            row.period_tag.clone(),
            row.person_name.clone(),
            money(context, row.sum_debt),
            money(context, row.sum_repaid),
            money(context, row.remaining_debt),
            row.status.to_string(),
        ]);
    }
    for line in table.render() {
        output::info(line);
    }
    Ok(())
}

fn cashback(context: &ShellContext, args: &[&str]) -> Result<(), CliError> {
    let (account_id, amount_raw) = match args {
        [account, amount, ..] => (*account, *amount),
        _ => return Err(CliError::Input("usage: cashback <account> <amount> [date]".into())),
    };
    let amount = amount_raw
        .replace([',', '.'], "")
        .parse::<i64>()
        .map_err(|_| CliError::Input(format!("invalid amount `{}`", amount_raw)))?;
    let date = match args.get(2) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| CliError::Input(format!("invalid date `{}`", raw)))?,
        None => Local::now().date_naive(),
    };

    let book = context.manager.book()?;
    let account = AccountService::get(book, account_id)?;
    let usage = account
        .cashback
        .map(|policy| crate::cashback::resolve_cycle_tag(date, policy.statement_day))
        .transpose()?
        .map(|tag| CashbackService::cycle_usage(book, account_id, &tag));
    let preview = CashbackService::preview(account, date, amount, Ok(usage.unwrap_or(0)))?;

    match preview {
        None => output::info(format!("Account `{}` has no cashback policy.", account_id)),
        Some(preview) => {
            output::section(format!("Cycle {}", preview.cycle_tag));
            output::info(format!("Used this cycle: {}", money(context, preview.used_budget)));
            output::info(format!(
                "Remaining budget: {}",
                money(context, preview.remaining_budget)
            ));
            match preview.status {
                CapStatus::Exhausted => {
                    output::warning("Cashback budget for this cycle is exhausted.")
                }
                _ => output::info(format!(
                    "Max for this transaction: {} (~{})",
                    money(context, preview.effective_cap),
                    format_percent(&context.locale, preview.equivalent_percent)
                )),
            }
        }
    }
    Ok(())
}

fn add(context: &mut ShellContext) -> Result<(), CliError> {
    if context.mode == CliMode::Script {
        return Err(CliError::Command("`add` needs an interactive terminal".into()));
    }
    forms::run_add_transaction(context)
}

fn import(context: &mut ShellContext, args: &[&str]) -> Result<(), CliError> {
    let path = args
        .first()
        .ok_or_else(|| CliError::Input("usage: import <file.csv> [collection]".into()))?;
    let collection = match args.get(1) {
        Some(raw) => CsvCollection::from_file_name(raw)
            .ok_or_else(|| CliError::Input(format!("unknown collection `{}`", raw)))?,
        None => {
            let file_name = std::path::Path::new(path)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(path);
            CsvCollection::from_file_name(file_name).ok_or_else(|| {
                CliError::Input(format!(
                    "cannot infer collection from `{}`; pass it explicitly",
                    file_name
                ))
            })?
        }
    };
    let file = File::open(path)?;
    let book = context.manager.book_mut()?;
    let report = import_csv(book, collection, file)?;
    output::success(format!(
        "Imported {} rows into {:?}.",
        report.imported, collection
    ));
    for warning in &report.warnings {
        output::warning(warning);
    }
    output::info("Run `save` to persist the imported data.");
    Ok(())
}

fn recompute(context: &mut ShellContext) -> Result<(), CliError> {
    let book = context.manager.book_mut()?;
    AccountService::recompute_balances(book);
    output::success("Account balances recomputed.");
    Ok(())
}

fn rebuild_debts(context: &mut ShellContext) -> Result<(), CliError> {
    let book = context.manager.book_mut()?;
    DebtService::rebuild(book);
    output::success(format!("Debt ledger rebuilt ({} entries).", book.debt_ledger.len()));
    Ok(())
}

fn rebuild_cashback(context: &mut ShellContext) -> Result<(), CliError> {
    let book = context.manager.book_mut()?;
    CashbackService::rebuild(book)?;
    output::success(format!(
        "Cashback ledger rebuilt ({} entries).",
        book.cashback_ledger.len()
    ));
    Ok(())
}
