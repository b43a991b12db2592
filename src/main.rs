use anyhow::Result;
use clap::Parser;
use winit::event_loop::EventLoop;

use playground::cli::CliArgs;
use playground::codec;
use playground::formatter;
use playground::prefs::{MemoryStore, PreferenceStore, YamlPreferenceStore};
use playground::runtime::Runtime;
use playground::session;

mod shell;

use shell::webview::WebviewHost;
use shell::{ShellApp, ShellEvent};

fn main() -> Result<()> {
    playground::tracing::init();

    let startup = CliArgs::parse().into_config().map_err(anyhow::Error::msg)?;
    let config = startup.load_config();

    if startup.print_link {
        let fragment = startup.link.as_deref().and_then(session::fragment_of);
        let token = codec::encode(&session::initial_source(fragment));
        println!("{}", session::share_link(&token));
        return Ok(());
    }

    let store: Box<dyn PreferenceStore> = match YamlPreferenceStore::open_default() {
        Some(store) => Box::new(store),
        None => {
            tracing::warn!("No config directory; preferences will not persist");
            Box::new(MemoryStore::new())
        }
    };

    let model = session::bootstrap(config, store.as_ref(), startup.link.as_deref());
    let formatter = formatter::from_config(&model.config.engine);
    let runtime = Runtime::new(model, formatter, store, WebviewHost::new());

    let event_loop = EventLoop::<ShellEvent>::with_user_event().build()?;
    let mut app = ShellApp::new(runtime, event_loop.create_proxy());
    event_loop.run_app(&mut app)?;

    Ok(())
}
