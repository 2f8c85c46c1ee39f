//! Guided transaction entry: the shell counterpart of the original entry
//! screen, including the live cashback-budget hint and discount clamping.

use chrono::{Local, NaiveDate};
use dialoguer::{Confirm, Input, Select};

use crate::cashback::{clamp_fixed, clamp_percent, CapStatus};
use crate::cli::core::{CliError, ShellContext};
use crate::cli::output;
use crate::core::services::{
    AccountService, CashbackPreview, CashbackService, NewTransaction, TransactionService,
};
use crate::currency::{format_currency_value, format_percent};
use crate::domain::{Identifiable, NamedEntity, TransactionNature};

struct Choice {
    id: String,
    label: String,
}

fn simple_choices<T: Identifiable + NamedEntity>(items: &[T]) -> Vec<Choice> {
    items
        .iter()
        .map(|item| Choice {
            id: item.id().to_string(),
            label: item.name().to_string(),
        })
        .collect()
}

pub fn run_add_transaction(context: &mut ShellContext) -> Result<(), CliError> {
    let nature = prompt_nature(context)?;
    let accounts = account_choices(context)?;
    if accounts.is_empty() {
        return Err(CliError::Command(
            "the book has no active accounts; import or add accounts first".into(),
        ));
    }

    let from_id = match nature {
        TransactionNature::Expense | TransactionNature::Transfer => Some(prompt_choice(
            context,
            "Source account",
            &accounts,
        )?),
        TransactionNature::Income => None,
    };
    let to_id = match nature {
        TransactionNature::Income | TransactionNature::Transfer => Some(prompt_choice(
            context,
            "Target account",
            &accounts,
        )?),
        TransactionNature::Expense => None,
    };
    if let (Some(from), Some(to)) = (&from_id, &to_id) {
        if from == to {
            return Err(CliError::Input(
                "source and target accounts must differ".into(),
            ));
        }
    }

    let amount = prompt_amount(context)?;
    let date = prompt_date(context)?;
    let subcategory = prompt_optional_choice(context, "Category", &subcategory_choices(context, nature)?)?;
    let person = prompt_optional_choice(context, "Person", &people_choices(context)?)?;
    let notes: String = Input::with_theme(&context.theme)
        .with_prompt("Notes")
        .allow_empty(true)
        .interact_text()?;

    let (percent, fixed) = prompt_discounts(context, from_id.as_deref(), date, amount)?;

    let mut input = NewTransaction::new(date, amount).discounts(percent, fixed);
    input.from_account = from_id;
    input.to_account = to_id;
    input.person_id = person;
    input.subcategory_id = subcategory;
    if !notes.trim().is_empty() {
        input.notes = Some(notes.trim().to_string());
    }

    let book = context.manager.book_mut()?;
    let id = TransactionService::add(book, input)?;
    let final_price = book
        .transaction(id)
        .map(|txn| txn.final_price)
        .unwrap_or(amount);
    output::success(format!(
        "Recorded transaction ({}).",
        format_currency_value(&context.locale, final_price, &context.currency)
    ));
    output::info("Run `save` to persist it.");
    Ok(())
}

fn prompt_nature(context: &ShellContext) -> Result<TransactionNature, CliError> {
    let labels = ["Expense", "Income", "Transfer"];
    let index = Select::with_theme(&context.theme)
        .with_prompt("Transaction type")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(match index {
        0 => TransactionNature::Expense,
        1 => TransactionNature::Income,
        _ => TransactionNature::Transfer,
    })
}

fn account_choices(context: &ShellContext) -> Result<Vec<Choice>, CliError> {
    let book = context.manager.book()?;
    Ok(AccountService::list(book)
        .into_iter()
        .filter(|account| account.is_active)
        .map(|account| Choice {
            id: account.id.clone(),
            label: format!("{} ({})", account.name, account.id),
        })
        .collect())
}

fn people_choices(context: &ShellContext) -> Result<Vec<Choice>, CliError> {
    let book = context.manager.book()?;
    Ok(simple_choices(&book.people))
}

fn subcategory_choices(
    context: &ShellContext,
    nature: TransactionNature,
) -> Result<Vec<Choice>, CliError> {
    let book = context.manager.book()?;
    Ok(book
        .subcategories
        .iter()
        .filter(|sub| {
            book.category(&sub.category_id)
                .map(|category| category.nature == nature)
                .unwrap_or(false)
        })
        .map(|sub| {
            let parent = book
                .category(&sub.category_id)
                .map(|category| category.name.clone())
                .unwrap_or_default();
            Choice {
                id: sub.id.clone(),
                label: format!("{} / {}", parent, sub.name),
            }
        })
        .collect())
}

fn prompt_choice(
    context: &ShellContext,
    prompt: &str,
    choices: &[Choice],
) -> Result<String, CliError> {
    let labels: Vec<&str> = choices.iter().map(|choice| choice.label.as_str()).collect();
    let index = Select::with_theme(&context.theme)
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(choices[index].id.clone())
}

fn prompt_optional_choice(
    context: &ShellContext,
    prompt: &str,
    choices: &[Choice],
) -> Result<Option<String>, CliError> {
    if choices.is_empty() {
        return Ok(None);
    }
    let mut labels = vec!["(none)"];
    labels.extend(choices.iter().map(|choice| choice.label.as_str()));
    let index = Select::with_theme(&context.theme)
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(if index == 0 {
        None
    } else {
        Some(choices[index - 1].id.clone())
    })
}

fn prompt_amount(context: &ShellContext) -> Result<i64, CliError> {
    loop {
        let raw: String = Input::with_theme(&context.theme)
            .with_prompt("Amount (VND)")
            .interact_text()?;
        match raw.replace([',', '.'], "").parse::<i64>() {
            Ok(amount) if amount > 0 => return Ok(amount),
            _ => output::warning(format!("`{}` is not a positive amount.", raw)),
        }
    }
}

fn prompt_date(context: &ShellContext) -> Result<NaiveDate, CliError> {
    let today = Local::now().date_naive();
    loop {
        let raw: String = Input::with_theme(&context.theme)
            .with_prompt("Date")
            .default(today.to_string())
            .interact_text()?;
        match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => return Ok(date),
            Err(_) => output::warning(format!("`{}` is not a YYYY-MM-DD date.", raw)),
        }
    }
}

/// Collects the discount pair. When the source account carries a cashback
/// policy the current cycle budget is shown first and both fields are
/// clamped as they are entered, mirroring the entry screen's behavior.
fn prompt_discounts(
    context: &ShellContext,
    from_account: Option<&str>,
    date: NaiveDate,
    amount: i64,
) -> Result<(f64, i64), CliError> {
    let preview = budget_preview(context, from_account, date, amount)?;

    if preview.is_none() {
        let wants_discount = Confirm::with_theme(&context.theme)
            .with_prompt("Apply a discount?")
            .default(false)
            .interact()?;
        if !wants_discount {
            return Ok((0.0, 0));
        }
    }

    if let Some(preview) = &preview {
        show_budget_hint(context, preview);
        if preview.status == CapStatus::Exhausted {
            return Ok((0.0, 0));
        }
    }

    let cap = preview.as_ref().map(|preview| preview.effective_cap);

    let percent_raw: f64 = Input::with_theme(&context.theme)
        .with_prompt("Discount (%)")
        .default(0.0)
        .interact_text()?;
    let percent = match cap {
        Some(cap) => clamp_percent(percent_raw, 0, amount, cap),
        None => percent_raw.clamp(0.0, 100.0),
    };
    if (percent - percent_raw).abs() > 1e-9 {
        output::warning(format!(
            "Discount capped to {} by the cycle budget.",
            format_percent(&context.locale, percent)
        ));
    }

    let fixed_raw: String = Input::with_theme(&context.theme)
        .with_prompt("Discount (VND)")
        .default("0".into())
        .interact_text()?;
    let fixed_value = fixed_raw
        .replace([',', '.'], "")
        .parse::<i64>()
        .unwrap_or(0)
        .max(0);
    let fixed = match cap {
        Some(cap) => clamp_fixed(fixed_value, percent, amount, cap),
        None => fixed_value,
    };
    if fixed != fixed_value {
        output::warning(format!(
            "Fixed discount capped to {} by the cycle budget.",
            format_currency_value(&context.locale, fixed, &context.currency)
        ));
    }

    Ok((percent, fixed))
}

fn budget_preview(
    context: &ShellContext,
    from_account: Option<&str>,
    date: NaiveDate,
    amount: i64,
) -> Result<Option<CashbackPreview>, CliError> {
    let Some(account_id) = from_account else {
        return Ok(None);
    };
    let book = context.manager.book()?;
    let account = AccountService::get(book, account_id)?;
    let Some(policy) = account.cashback else {
        return Ok(None);
    };
    let usage = crate::cashback::resolve_cycle_tag(date, policy.statement_day)
        .map(|tag| CashbackService::cycle_usage(book, account_id, &tag));
    Ok(CashbackService::preview(account, date, amount, usage)?)
}

fn show_budget_hint(context: &ShellContext, preview: &CashbackPreview) {
    if preview.degraded {
        output::warning("Cashback usage could not be read; the budget figure may be inaccurate.");
    }
    if preview.used_budget > 0 {
        output::info(format!(
            "Used this cycle ({}): {}",
            preview.cycle_tag,
            format_currency_value(&context.locale, preview.used_budget, &context.currency)
        ));
    }
    match preview.status {
        CapStatus::Exhausted => {
            output::warning("Cashback budget for this cycle is exhausted; no discount applies.")
        }
        _ => output::info(format!(
            "Max cashback for this transaction: {} (~{})",
            format_currency_value(&context.locale, preview.effective_cap, &context.currency),
            format_percent(&context.locale, preview.equivalent_percent)
        )),
    }
}
