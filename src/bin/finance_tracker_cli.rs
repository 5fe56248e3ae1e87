use std::{collections::HashMap, env, process};

use chrono::Utc;
use colored::Colorize;
use finance_tracker::{
    config::{self, Config, ConfigManager},
    errors::LedgerError,
    init,
    ledger::{parse_day, DateWindow, Transaction, TransactionType},
    report::{self, Month},
    storage::JsonFileStore,
    FinanceStore, PeriodTotals,
};

fn main() {
    init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(err) = run(&args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), LedgerError> {
    let Some((command, rest)) = args.split_first() else {
        print_usage();
        process::exit(1);
    };
    if matches!(command.as_str(), "help" | "--help" | "-h") {
        print_usage();
        return Ok(());
    }

    let base = config::app_data_dir();
    let config = ConfigManager::with_base_dir(base.clone())?.load()?;
    let storage = JsonFileStore::new(config::data_dir_in(&base))?;
    let mut store = FinanceStore::with_key(Box::new(storage), config.storage_key.clone());
    store.load_from_storage();

    match command.as_str() {
        "add" => add(&mut store, rest),
        "delete" => delete(&mut store, rest),
        "list" => list(&store, &config, rest),
        "summary" => summary(&store, &config, rest),
        "totals" => totals(&store, &config, rest),
        other => {
            print_usage();
            Err(LedgerError::InvalidInput(format!("unknown command `{other}`")))
        }
    }
}

fn add(store: &mut FinanceStore, args: &[String]) -> Result<(), LedgerError> {
    let [kind, amount, date, description @ ..] = args else {
        return Err(LedgerError::InvalidInput(
            "usage: add <income|expense> <amount> <YYYY-MM-DD> <description...>".into(),
        ));
    };
    let kind: TransactionType = kind.parse()?;
    let amount = parse_amount(amount)?;
    let date = parse_day(date)?;
    let description = description.join(" ");
    if description.trim().is_empty() {
        return Err(LedgerError::InvalidInput("description is required".into()));
    }

    store.add_transaction(Transaction::new(kind, amount, date, description));
    println!("{}", "Transaction added successfully".green());
    Ok(())
}

fn delete(store: &mut FinanceStore, args: &[String]) -> Result<(), LedgerError> {
    let [index] = args else {
        return Err(LedgerError::InvalidInput("usage: delete <index>".into()));
    };
    let index: i64 = index
        .parse()
        .map_err(|_| LedgerError::InvalidInput(format!("`{index}` is not an index")))?;

    match usize::try_from(index)
        .ok()
        .and_then(|position| store.delete_transaction(position))
    {
        Some(removed) => println!(
            "{} {} ({})",
            "Deleted".yellow(),
            removed.description,
            removed.date
        ),
        None => println!("No transaction at index {index}"),
    }
    Ok(())
}

fn list(store: &FinanceStore, config: &Config, args: &[String]) -> Result<(), LedgerError> {
    let options = parse_options(args, &["from", "to", "search"])?;
    let window = window_option(&options)?;
    let query = options.get("search").map(String::as_str).unwrap_or("");

    let rows: Vec<(usize, &Transaction)> = store
        .transactions()
        .iter()
        .enumerate()
        .filter(|(_, txn)| window.map_or(true, |w| w.contains(txn.date)))
        .filter(|(_, txn)| report::matches_description(txn, query))
        .collect();

    println!("{}", "Transaction List".bold());
    if rows.is_empty() {
        println!("No Data");
        return Ok(());
    }
    for (index, txn) in rows {
        println!(
            "{:>4}  {}  {:<7}  {:>14}  {}",
            index,
            txn.date.format(&config.date_format),
            styled_kind(txn.kind),
            report::format_amount(txn.amount, &config.currency_symbol),
            txn.description
        );
    }
    Ok(())
}

fn summary(store: &FinanceStore, config: &Config, args: &[String]) -> Result<(), LedgerError> {
    let options = parse_options(args, &["month"])?;
    let month = match options.get("month") {
        Some(raw) => raw.parse::<Month>()?,
        None => Month::containing(Utc::now().date_naive())?,
    };
    let summary = report::monthly_summary(store, month);

    println!("{} {}", "Monthly Summary".bold(), summary.month);
    println!("Transactions:   {}", summary.transaction_count);
    print_totals(&summary.totals, config);
    println!(
        "Balance (all):  {}",
        report::format_amount(store.balance(), &config.currency_symbol)
    );
    Ok(())
}

fn totals(store: &FinanceStore, config: &Config, args: &[String]) -> Result<(), LedgerError> {
    let options = parse_options(args, &["from", "to"])?;
    let totals = match window_option(&options)? {
        Some(window) => store.totals_in(&window),
        None => PeriodTotals {
            total_income: store.total_income(),
            total_expenses: store.total_expenses(),
            net_savings: store.balance(),
        },
    };
    print_totals(&totals, config);
    Ok(())
}

fn print_totals(totals: &PeriodTotals, config: &Config) {
    let symbol = &config.currency_symbol;
    println!(
        "Income:         {}",
        report::format_amount(totals.total_income, symbol).as_str().green()
    );
    println!(
        "Expenses:       {}",
        report::format_amount(totals.total_expenses, symbol).as_str().red()
    );
    println!(
        "Net savings:    {}",
        report::format_amount(totals.net_savings, symbol)
    );
}

fn styled_kind(kind: TransactionType) -> colored::ColoredString {
    match kind {
        TransactionType::Income => kind.as_str().green(),
        TransactionType::Expense => kind.as_str().red(),
    }
}

fn parse_amount(raw: &str) -> Result<f64, LedgerError> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| LedgerError::InvalidInput(format!("`{raw}` is not an amount")))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(LedgerError::InvalidInput(
            "amount must be a non-negative number".into(),
        ));
    }
    Ok(amount)
}

/// Collects `--name value` pairs, rejecting names not in `allowed`.
fn parse_options(args: &[String], allowed: &[&str]) -> Result<HashMap<String, String>, LedgerError> {
    let mut options = HashMap::new();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let name = flag
            .strip_prefix("--")
            .filter(|name| allowed.contains(name))
            .ok_or_else(|| LedgerError::InvalidInput(format!("unexpected argument `{flag}`")))?;
        let value = iter
            .next()
            .ok_or_else(|| LedgerError::InvalidInput(format!("`{flag}` needs a value")))?;
        options.insert(name.to_string(), value.clone());
    }
    Ok(options)
}

fn window_option(options: &HashMap<String, String>) -> Result<Option<DateWindow>, LedgerError> {
    match (options.get("from"), options.get("to")) {
        (Some(from), Some(to)) => Ok(Some(DateWindow::parse(from, to)?)),
        (None, None) => Ok(None),
        _ => Err(LedgerError::InvalidInput(
            "--from and --to must be given together".into(),
        )),
    }
}

fn print_usage() {
    eprintln!(
        "Usage: finance_tracker_cli <command>\n\
         Commands:\n  \
         add <income|expense> <amount> <YYYY-MM-DD> <description...>\n  \
         delete <index>\n  \
         list [--from YYYY-MM-DD --to YYYY-MM-DD] [--search TEXT]\n  \
         summary [--month YYYY-MM]\n  \
         totals [--from YYYY-MM-DD --to YYYY-MM-DD]\n\
         Data lives under $FINANCE_TRACKER_HOME (default ~/.finance_tracker)."
    );
}
