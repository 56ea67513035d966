use std::{env, process};

use colored::Colorize;

use compass_core::{
    config::ConfigManager,
    core::{
        input::{parse_amount, parse_income},
        QuestStore, SummaryService,
    },
    currency::{format_currency, symbol_for, CurrencyCode},
    domain::{Displayable, Quest},
    init_with_filter,
    storage::JsonFileStorage,
    utils::build_info,
    QuestError, QuestResult,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> QuestResult<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    init_with_filter(&config.log_filter);

    let storage = JsonFileStorage::in_dir(config.resolve_data_dir(manager.base_dir()))?;
    let mut store = QuestStore::open(Box::new(storage));

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("show");
    let rest = &args[args.len().min(1)..];

    match (command, rest) {
        ("show", []) => {}
        ("list", []) => {
            print_quest_list(&store);
            return Ok(());
        }
        ("new", [_, ..]) => {
            let quest = store.create_quest(&rest.join(" "))?;
            println!("Created quest {}", quest.id);
        }
        ("select", [id]) => {
            if store.quest(id).is_none() {
                return Err(QuestError::NotFound(format!("quest `{}`", id)));
            }
            store.set_selected(Some(id.as_str()));
        }
        ("archive", []) => {
            let id = selected_id(&store)?;
            archive(&mut store, &id)?;
        }
        ("archive", [id]) => archive(&mut store, id)?,
        ("delete", [id]) => {
            if !store.delete_quest(id) {
                return Err(QuestError::NotFound(format!("quest `{}`", id)));
            }
        }
        ("income", [raw]) => {
            let id = selected_id(&store)?;
            store.set_income(&id, parse_income(raw)?)?;
        }
        ("add", [name, raw]) => {
            let id = selected_id(&store)?;
            store.add_commitment(&id, name, parse_amount(raw)?)?;
        }
        ("edit", [commitment_id, name, raw]) => {
            let id = selected_id(&store)?;
            store.edit_commitment(&id, commitment_id, name, parse_amount(raw)?)?;
        }
        ("remove", [commitment_id]) => {
            let id = selected_id(&store)?;
            if !store.delete_commitment(&id, commitment_id) {
                println!("Nothing removed.");
            }
        }
        ("toggle", [commitment_id]) => {
            let id = selected_id(&store)?;
            if store.toggle_commitment_paid(&id, commitment_id).is_none() {
                return Err(QuestError::NotFound(format!(
                    "commitment `{}`",
                    commitment_id
                )));
            }
        }
        ("currency", []) => {
            print_currencies(store.settings().currency);
            return Ok(());
        }
        ("currency", [code]) => {
            let currency = code.parse::<CurrencyCode>()?;
            store.set_currency(currency);
            println!("Currency set to {} ({})", currency, currency.display_name());
        }
        ("reset", []) => store.reset_all(),
        ("version", []) => {
            println!("{}", build_info::current().summary());
            return Ok(());
        }
        _ => {
            print_usage();
            process::exit(2);
        }
    }

    print_selected(&store);
    Ok(())
}

fn selected_id(store: &QuestStore) -> Result<String, QuestError> {
    store
        .selected_id()
        .map(str::to_string)
        .ok_or_else(|| QuestError::NotFound("no quest selected".into()))
}

fn archive(store: &mut QuestStore, id: &str) -> Result<(), QuestError> {
    if store.archive_quest(id) {
        Ok(())
    } else if store.is_archived(id) {
        Err(QuestError::Archived(id.to_string()))
    } else {
        Err(QuestError::NotFound(format!("quest `{}`", id)))
    }
}

fn print_quest_list(store: &QuestStore) {
    let mut active: Vec<&Quest> = store.active().iter().collect();
    let mut archived: Vec<&Quest> = store.archived().iter().collect();
    active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    archived.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    println!("{}", "Active quests".bold());
    for quest in active {
        println!("{} {}  {}", marker(store, quest), quest.id, quest.display_label());
    }
    println!("{}", "Archived quests".bold());
    for quest in archived {
        println!("{} {}  {}", marker(store, quest), quest.id, quest.display_label());
    }
}

fn marker(store: &QuestStore, quest: &Quest) -> &'static str {
    if store.selected_id() == Some(quest.id.as_str()) {
        "*"
    } else {
        " "
    }
}

fn print_selected(store: &QuestStore) {
    let currency = store.settings().currency;
    let Some(quest) = store.selected_quest() else {
        println!("No quest selected.");
        return;
    };
    let mut title = format!("{} [{}]", quest.name, quest.id).bold().to_string();
    if store.is_archived(&quest.id) {
        title.push_str(&format!(" {}", "(archived)".dimmed()));
    }
    println!("{title}");
    println!("Income: {}", format_currency(quest.income, currency));
    for commitment in &quest.commitments {
        let status = if commitment.paid {
            "paid".green()
        } else {
            "unpaid".yellow()
        };
        println!(
            "  {}  {:<24} {:>14}  {}",
            commitment.id,
            commitment.name,
            format_currency(commitment.value, currency),
            status
        );
    }

    let summary = SummaryService::quest(quest);
    println!(
        "Paid {} / Unpaid {} ({:.0}% paid)",
        format_currency(summary.total_paid, currency),
        format_currency(summary.total_unpaid, currency),
        summary.percentage_paid
    );
    let remaining = format_currency(summary.remaining_vs_unpaid, currency);
    if summary.remaining_vs_unpaid < 0.0 {
        println!("Remaining after unpaid: {}", remaining.red());
    } else {
        println!("Remaining after unpaid: {}", remaining);
    }

    let global = SummaryService::global(store.active(), store.archived());
    println!(
        "{} active / {} archived, active income {}",
        global.active_count,
        global.archived_count,
        format_currency(global.total_income, currency)
    );
}

fn print_currencies(current: CurrencyCode) {
    for code in CurrencyCode::ALL {
        let line = format!(
            "{}  {:<4} {}",
            symbol_for(code),
            code.as_str(),
            code.display_name()
        );
        if code == current {
            println!("* {}", line.bold());
        } else {
            println!("  {}", line);
        }
    }
}

fn print_usage() {
    eprintln!(
        "Usage: compass_cli <command>\n\
         \n\
         Commands:\n\
         \x20 show                         Show the selected quest (default)\n\
         \x20 list                         List active and archived quests\n\
         \x20 new <name>                   Create and select a quest\n\
         \x20 select <quest-id>            Select a quest\n\
         \x20 archive [quest-id]           Archive a quest (default: selected)\n\
         \x20 delete <quest-id>            Delete a quest\n\
         \x20 income <amount>              Set income of the selected quest\n\
         \x20 add <name> <amount>          Add a commitment\n\
         \x20 edit <id> <name> <amount>    Edit a commitment\n\
         \x20 remove <id>                  Delete a commitment\n\
         \x20 toggle <id>                  Flip a commitment's paid flag\n\
         \x20 currency [code]              List currencies, or set the display currency\n\
         \x20 reset                        Delete all data\n\
         \x20 version                      Print build information"
    );
}
