//! Implementation of `locus search`.

use std::{process::ExitCode, sync::Arc, time::Duration};

use crossbeam_channel::RecvTimeoutError;
use locus_session::{
    MemoryRetrieval, Places, SearchMode, SearchRequest, SessionEvent, SessionManager,
    SessionOptions,
};
use tracing::debug;

use crate::cli::{
    args::SearchCommand,
    context::CommandContext,
    output::{JsonSearchEvent, dim, format_end, format_result, header, print_json_line},
};

/// Longest wait for the next event before giving up on the session.
const EVENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Version of the single query the command submits.
const QUERY_VERSION: u64 = 1;

/// Runs one search session over a places file and prints what it delivers.
///
/// Text output lists results as batches arrive and ends with a completion marker; JSON output
/// prints one event object per line.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let matcher = match ctx.matcher() {
        Ok(matcher) => Arc::new(matcher),
        Err(code) => return code,
    };

    let places = match Places::load(&cmd.places) {
        Ok(places) => places,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut retrieval = MemoryRetrieval::new(places);
    if let Some(batch_size) = cmd.batch_size {
        retrieval = retrieval.with_batch_size(batch_size);
    }

    let options = SessionOptions::from_config(&ctx.config);
    let manager = match SessionManager::new(matcher, Arc::new(retrieval), options) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mode = cmd.mode.unwrap_or(SearchMode::Everywhere);
    let mut request = SearchRequest::new(
        mode,
        cmd.query.as_str(),
        QUERY_VERSION,
        ctx.locale(cmd.locale.as_deref()),
    );
    if cmd.category {
        request = request.category();
    }
    if let Some(group) = cmd.group {
        request = request.in_group(group);
    }

    if let Err(e) = manager.submit_query(request) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    if !cmd.output.json {
        println!("{}", header(&format!("{mode}: {}", cmd.query)));
    }
    stream_events(&manager, mode, cmd.output.json)
}

/// Prints events until the session of `requested` ends.
///
/// JSON output includes the viewport half of a combined search; text output shows only the
/// requested mode.
fn stream_events(manager: &SessionManager, requested: SearchMode, json: bool) -> ExitCode {
    let mut delivered = 0;
    loop {
        let event = match manager.events().recv_timeout(EVENT_TIMEOUT) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => {
                eprintln!("error: no response from search after {}s", EVENT_TIMEOUT.as_secs());
                return ExitCode::FAILURE;
            }
            Err(RecvTimeoutError::Disconnected) => {
                eprintln!("error: search session closed unexpectedly");
                return ExitCode::FAILURE;
            }
        };

        match event {
            SessionEvent::Update {
                mode,
                version,
                results,
            } => {
                debug!(%mode, version, batch = results.len(), "update");
                if json {
                    if let Err(code) = print_json_line(&JsonSearchEvent::Update {
                        mode,
                        version,
                        results: &results,
                    }) {
                        return code;
                    }
                } else if mode == requested {
                    for result in &results {
                        println!("   {}", format_result(result));
                    }
                }
                if mode == requested {
                    delivered += results.len();
                }
            }
            SessionEvent::End {
                mode,
                version,
                status,
            } => {
                if json {
                    let end = JsonSearchEvent::End {
                        mode,
                        version,
                        status,
                    };
                    if let Err(code) = print_json_line(&end) {
                        return code;
                    }
                    if mode == requested {
                        return ExitCode::SUCCESS;
                    }
                    continue;
                }
                if mode != requested {
                    continue;
                }
                if delivered == 0 {
                    println!("   {}", dim("No results found."));
                }
                println!("{}", format_end(status, delivered));
                return ExitCode::SUCCESS;
            }
        }
    }
}
