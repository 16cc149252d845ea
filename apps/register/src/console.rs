//! # Console Surface
//!
//! Line-oriented operator interface over stdin/stdout.
//!
//! ```text
//! remito> add 2 500 Hammer
//!   [0]    2 x Hammer                        $500.00      $1,000.00
//!   Receipt No. 0001 (open)   Total: $1,000.00
//! remito> done
//!   Receipt No. 0001 saved: $1,000.00 -> remitos/remito_0001.pdf
//!   Receipt No. 0002 started
//! ```
//!
//! Parsing only; every operation goes through [`crate::commands`].

use chrono::Local;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use remito_core::LineId;

use crate::commands::{self, FinalizeResponse, ReceiptView};
use crate::error::ApiError;
use crate::state::{ConfigState, DbState, ReceiptState};

const PROMPT: &str = "remito> ";

const HELP: &str = "\
Commands:
  add <qty> <price> <product...>   add a line item
  list                             show the receipt in progress
  rm <id>...                       remove line items by id
  new                              discard this receipt and start another
  done                             save and print the receipt
  help                             show this help
  quit                             exit
";

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        quantity: String,
        unit_price: String,
        product: String,
    },
    List,
    Remove(Vec<LineId>),
    New,
    Done,
    Help,
    Quit,
    Blank,
}

impl Command {
    /// Parses a console line. Item text is passed through unvalidated.
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim_start()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Ok(Command::Blank),
            "add" => {
                let mut parts = rest.splitn(3, char::is_whitespace);
                let quantity = parts.next().unwrap_or_default();
                let unit_price = parts.next().unwrap_or_default();
                let product = parts.next().unwrap_or_default().trim();
                if quantity.is_empty() || unit_price.is_empty() {
                    return Err("usage: add <qty> <price> <product...>".to_string());
                }
                Ok(Command::Add {
                    quantity: quantity.to_string(),
                    unit_price: unit_price.to_string(),
                    product: product.to_string(),
                })
            }
            "list" | "ls" => Ok(Command::List),
            "rm" | "remove" => rest
                .split_whitespace()
                .map(|id| {
                    id.parse::<u64>()
                        .map(LineId)
                        .map_err(|_| format!("'{}' is not a line id", id))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Command::Remove),
            "new" => Ok(Command::New),
            "done" | "finalize" => Ok(Command::Done),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command '{}', type 'help'", other)),
        }
    }
}

/// Drives the register from `input` until `quit` or end of input.
pub struct Console<'a> {
    db: &'a DbState,
    receipt: &'a ReceiptState,
    config: &'a ConfigState,
}

impl<'a> Console<'a> {
    pub fn new(db: &'a DbState, receipt: &'a ReceiptState, config: &'a ConfigState) -> Self {
        Console {
            db,
            receipt,
            config,
        }
    }

    /// Starts the first session, then reads commands line by line.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let started = commands::start_new_session(self.db, self.receipt, self.config).await;
        write_started(&mut output, started).await?;

        let mut lines = input.lines();
        loop {
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(usage) => {
                    writeln(&mut output, &format!("  {}", usage)).await?;
                    continue;
                }
            };
            debug!(?command, "Console command");

            if command == Command::Quit {
                break;
            }
            self.execute(command, &mut output).await?;
        }

        output.flush().await
    }

    async fn execute<W>(&self, command: Command, output: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        match command {
            Command::Add {
                quantity,
                unit_price,
                product,
            } => {
                let result =
                    commands::add_item(self.receipt, self.config, &quantity, &product, &unit_price)
                        .await;
                write_view(output, result).await
            }
            Command::List => {
                let result = commands::current_receipt(self.receipt, self.config).await;
                write_view(output, result).await
            }
            Command::Remove(ids) => {
                let result = commands::remove_selected(self.receipt, self.config, &ids).await;
                write_view(output, result).await
            }
            Command::New => {
                let result = commands::start_new_session(self.db, self.receipt, self.config).await;
                write_started(output, result).await
            }
            Command::Done => {
                let today = Local::now().date_naive();
                let result =
                    commands::finalize_session(self.db, self.receipt, self.config, today).await;
                let finalized = result.is_ok();
                write_finalized(output, result).await?;

                if finalized {
                    let next = commands::start_new_session(self.db, self.receipt, self.config).await;
                    write_started(output, next).await?;
                }
                Ok(())
            }
            Command::Help => output.write_all(HELP.as_bytes()).await,
            Command::Quit | Command::Blank => Ok(()),
        }
    }
}

async fn writeln<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await
}

async fn write_error<W: AsyncWrite + Unpin>(output: &mut W, err: &ApiError) -> io::Result<()> {
    writeln(output, &format!("  error: {}", err.message)).await
}

async fn write_started<W: AsyncWrite + Unpin>(
    output: &mut W,
    result: Result<ReceiptView, ApiError>,
) -> io::Result<()> {
    match result {
        Ok(view) => writeln(output, &format!("  Receipt No. {} started", view.number)).await,
        Err(err) => write_error(output, &err).await,
    }
}

async fn write_view<W: AsyncWrite + Unpin>(
    output: &mut W,
    result: Result<ReceiptView, ApiError>,
) -> io::Result<()> {
    let view = match result {
        Ok(view) => view,
        Err(err) => return write_error(output, &err).await,
    };

    if view.lines.is_empty() {
        writeln(output, "  (no items)").await?;
    }
    for line in &view.lines {
        writeln(
            output,
            &format!(
                "  [{}] {:>4} x {:<24} {:>12} {:>14}",
                line.id, line.quantity, line.product, line.unit_price, line.subtotal
            ),
        )
        .await?;
    }
    writeln(
        output,
        &format!(
            "  Receipt No. {} ({})   Total: {}",
            view.number, view.state, view.total
        ),
    )
    .await
}

async fn write_finalized<W: AsyncWrite + Unpin>(
    output: &mut W,
    result: Result<FinalizeResponse, ApiError>,
) -> io::Result<()> {
    match result {
        Ok(done) => {
            writeln(
                output,
                &format!(
                    "  Receipt No. {} saved: {} -> {}",
                    done.number,
                    done.total,
                    done.document.display()
                ),
            )
            .await
        }
        Err(err) => write_error(output, &err).await,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
