// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("from").long("from").help("Start date YYYY-MM-DD (inclusive)"))
        .arg(Arg::new("to").long("to").help("End date YYYY-MM-DD (inclusive)"))
}

fn tx_command() -> Command {
    Command::new("tx")
        .about("Record and browse transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(Arg::new("type").long("type").required(true).help("income|expense"))
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                .arg(
                    Arg::new("description")
                        .long("description")
                        .required(true)
                        .help("At least 3 characters"),
                )
                .arg(
                    Arg::new("status")
                        .long("status")
                        .default_value("pending")
                        .help("pending|completed|cancelled"),
                )
                .arg(Arg::new("reference").long("reference"))
                .arg(Arg::new("payment_method").long("payment-method"))
                .arg(Arg::new("patient").long("patient").help("Patient id"))
                .arg(Arg::new("appointment").long("appointment").help("Appointment id"))
                .arg(Arg::new("recur").long("recur").help("daily|weekly|monthly|yearly"))
                .arg(
                    Arg::new("recur_until")
                        .long("recur-until")
                        .requires("recur")
                        .help("Last date of the recurrence"),
                ),
        )
        .subcommand(json_flags(range_args(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(Arg::new("type").long("type"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("status").long("status"))
                .arg(Arg::new("search").long("search").help("Match description or reference"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        )))
        .subcommand(
            Command::new("edit")
                .about("Change fields of a transaction")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("type").long("type"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("status").long("status"))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("reference").long("reference"))
                .arg(Arg::new("payment_method").long("payment-method")),
        )
        .subcommand(
            Command::new("rm")
                .about("Remove a transaction")
                .arg(Arg::new("id").required(true)),
        )
}

fn report_command() -> Command {
    Command::new("report")
        .about("Financial summaries")
        .subcommand_required(true)
        .subcommand(json_flags(range_args(
            Command::new("summary")
                .about("Totals, category breakdown and monthly series")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .action(ArgAction::Append)
                        .help("Restrict to a category; repeatable"),
                )
                .arg(
                    Arg::new("details")
                        .long("details")
                        .action(ArgAction::SetTrue)
                        .help("Include the matching transactions"),
                )
                .arg(
                    Arg::new("group_by")
                        .long("group-by")
                        .default_value("month")
                        .help("Extra day|week buckets next to the monthly series"),
                ),
        )))
        .subcommand(json_flags(range_args(
            Command::new("monthly")
                .about("Income, expenses and net per month")
                .arg(
                    Arg::new("chronological")
                        .long("chronological")
                        .action(ArgAction::SetTrue)
                        .help("Calendar order instead of first-seen order"),
                ),
        )))
        .subcommand(json_flags(range_args(
            Command::new("categories")
                .about("Amount per category")
                .arg(Arg::new("type").long("type").default_value("expense")),
        )))
        .subcommand(json_flags(
            Command::new("cashflow")
                .about("Daily inflow, outflow and balance over a trailing window")
                .arg(
                    Arg::new("days")
                        .long("days")
                        .value_parser(value_parser!(u32))
                        .default_value("30"),
                ),
        ))
        .subcommand(json_flags(range_args(
            Command::new("forecast").about("Monthly income with a 3-month linear forecast"),
        )))
        .subcommand(json_flags(range_args(
            Command::new("periods")
                .about("Income, expenses and net grouped by day, week or month")
                .arg(
                    Arg::new("group_by")
                        .long("group-by")
                        .default_value("month")
                        .help("day|week|month"),
                ),
        )))
}

pub fn build_cli() -> Command {
    Command::new("clinicdesk")
        .about("Clinic finance: transactions, reports and revenue forecast")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Print current settings"))
                .subcommand(
                    Command::new("set")
                        .about("Change a setting")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(tx_command())
        .subcommand(report_command())
        .subcommand(json_flags(
            Command::new("status").about("Status labels used across the dashboard"),
        ))
        .subcommand(Command::new("doctor").about("Check stored transactions for problems"))
}
