use crate::{
    args::RoninDebugArgs,
    cmd::{DispatchResult, Dispatcher},
    status::render_entry,
};
use eyre::{Result, WrapErr};
use ronin_bridge::{BridgeDiscovery, BridgeEnvironment, BridgeNavigator, BridgeServer};
use ronin_debugger::{DebuggerConfig, DiagnosticLog, WalletDebugger};
use rustyline::{DefaultEditor, ExternalPrinter, error::ReadlineError};
use std::{sync::Arc, time::Duration};
use yansi::Paint;

/// Prompt shown by the interactive session.
pub const PROMPT: &str = "ronin> ";

/// How often the interactive session checks the log for new entries.
const TAIL_INTERVAL: Duration = Duration::from_millis(100);

/// Starts the bridge and runs either the `--exec` commands or the interactive prompt.
pub async fn run(args: RoninDebugArgs) -> Result<()> {
    let config = args.load_config()?;
    trace!(?config, "loaded config");

    let mut server =
        BridgeServer::new(config.port, config.open_browser, config.request_timeout());
    server.start().await.wrap_err("failed to start the bridge server")?;
    let url = server.url();

    let debugger = Arc::new(build_debugger(&server, &config));
    print_banner(&server);

    let dispatcher = Dispatcher::new(debugger, url);
    let result = if args.exec.is_empty() {
        interactive(dispatcher.in_background()).await
    } else {
        exec(&dispatcher, &args.exec).await
    };

    server.stop().await?;
    result
}

fn build_debugger(server: &BridgeServer, config: &DebuggerConfig) -> WalletDebugger {
    let handle = server.handle();
    let discovery = BridgeDiscovery::new(handle.clone(), config.discovery_timeout());
    WalletDebugger::from_config(Arc::new(discovery), config)
        .with_navigator(Arc::new(BridgeNavigator::new(handle.clone())))
        .with_environment(Arc::new(BridgeEnvironment::new(handle)))
}

fn print_banner(server: &BridgeServer) {
    let url = server.url();
    if server.open_browser() {
        println!(
            "Open {} in a browser with Ronin Wallet installed.",
            url.as_str().cyan().bold()
        );
    } else {
        println!("Bridge page: {url}");
    }
    println!("{}", "Type `help` for a list of commands.".dim());
}

/// Runs each command to completion, printing the log entries it produced.
async fn exec(dispatcher: &Dispatcher, commands: &[String]) -> Result<()> {
    let log = dispatcher.debugger().log().clone();
    let mut last = None;

    dispatcher.debugger().discover_connector().await;
    print_new_entries(&log, &mut last, |line| println!("{line}"));

    for command in commands {
        println!("{} {command}", PROMPT.trim_end().green());
        let result = dispatcher.dispatch(command).await;
        print_new_entries(&log, &mut last, |line| println!("{line}"));
        match result {
            DispatchResult::Started | DispatchResult::CommandSuccess(None) => {}
            DispatchResult::CommandSuccess(Some(output)) => println!("{output}"),
            DispatchResult::CommandFailed(err) => eyre::bail!("`{command}`: {err}"),
            DispatchResult::Quit => break,
        }
    }
    Ok(())
}

async fn interactive(dispatcher: Dispatcher) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    let mut print: Box<dyn FnMut(String) + Send> = match rl.create_external_printer() {
        Ok(mut printer) => Box::new(move |line| {
            if let Err(err) = printer.print(format!("{line}\n")) {
                debug!(%err, "external printer failed");
            }
        }),
        Err(err) => {
            debug!(%err, "no external printer, writing to stdout");
            Box::new(|line| println!("{line}"))
        }
    };
    let log = dispatcher.debugger().log().clone();
    let tail = tokio::spawn(async move {
        let mut last = None;
        let mut interval = tokio::time::interval(TAIL_INTERVAL);
        loop {
            interval.tick().await;
            print_new_entries(&log, &mut last, &mut print);
        }
    });

    let debugger = dispatcher.debugger().clone();
    tokio::spawn(async move { debugger.discover_connector().await });

    let mut interrupt = false;
    let mut error = false;
    loop {
        let prompt = if error { PROMPT.red().to_string() } else { PROMPT.green().to_string() };
        let (editor, line) = tokio::task::spawn_blocking(move || {
            let line = rl.readline(&prompt);
            (rl, line)
        })
        .await?;
        rl = editor;

        match line {
            Ok(line) => {
                interrupt = false;
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if let Err(err) = rl.add_history_entry(line) {
                    debug!(%err, "failed to add history entry");
                }

                let result = dispatcher.dispatch(line).await;
                error = result.is_error();
                match result {
                    DispatchResult::Started | DispatchResult::CommandSuccess(None) => {}
                    DispatchResult::CommandSuccess(Some(output)) => println!("{output}"),
                    DispatchResult::CommandFailed(err) => eprintln!("{}", err.red()),
                    DispatchResult::Quit => break,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if interrupt {
                    break;
                }
                println!("(To exit, press Ctrl+C again)");
                interrupt = true;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                tail.abort();
                return Err(err).wrap_err("failed to read input");
            }
        }
    }

    tail.abort();
    Ok(())
}

fn print_new_entries(log: &DiagnosticLog, last: &mut Option<u64>, mut print: impl FnMut(String)) {
    for entry in log.after(*last) {
        *last = Some(entry.seq());
        print(render_entry(&entry));
    }
}
