use std::sync::Arc;

use netgains_core::{
    config::Config,
    deeplink::LinkParser,
    invite::{InviteFlow, InviteResolution, InviteResolver},
    storage::JsonFileStore,
    widgets::WidgetOrderStore,
    Error,
};
use netgains_supabase::SupabaseClient;

#[tokio::main]
async fn main() -> Result<(), Error> {
    netgains_core::logging::init("netgains");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("resolve") => {
            let Some(link) = args.get(1) else {
                return Err(Error::Config("usage: netgains resolve <link>".to_string()));
            };
            resolve_link(link).await
        }
        Some("widgets") => show_widgets(args.get(1).is_some_and(|a| a == "reset")).await,
        _ => Err(Error::Config(
            "usage: netgains resolve <link> | netgains widgets [reset]".to_string(),
        )),
    }
}

async fn resolve_link(raw: &str) -> Result<(), Error> {
    let cfg = Config::load()?;

    let link = LinkParser::new(cfg.invite_link_hosts.clone()).parse(raw)?;
    let Some(id) = link.id else {
        println!("Invalid link: no invite identifier");
        return Ok(());
    };

    let supabase = Arc::new(SupabaseClient::new(
        &cfg.supabase_url,
        cfg.supabase_anon_key.clone(),
        cfg.lookup_timeout,
    )?);
    let resolver = InviteResolver::new(supabase.clone(), supabase);

    let flow = InviteFlow::new(resolver, id);
    match flow.run().await {
        InviteResolution::Session(s) => {
            println!("Session invite: {} @ {} ({})", s.title, s.location, s.starts_at);
            println!("Hosted by {}", s.host_name);
        }
        InviteResolution::Group(g) => {
            println!("Group invite: {} ({} members)", g.name, g.member_count);
        }
        InviteResolution::NotFound(reason) | InviteResolution::Invalid(reason) => {
            println!("{reason}");
        }
        InviteResolution::Loading => unreachable!("run() returns a terminal state"),
    }

    Ok(())
}

async fn show_widgets(reset: bool) -> Result<(), Error> {
    let cfg = Config::load()?;
    let file = JsonFileStore::new(cfg.widget_store_file);
    println!("layout file: {}", file.path().display());
    let store = WidgetOrderStore::new(Arc::new(file));

    let widgets = if reset {
        store.reset_to_default().await
    } else {
        store.load().await
    };

    for w in widgets {
        let state = if w.enabled { "on " } else { "off" };
        println!("{:>2}  [{state}]  {}  ({})", w.order, w.title, w.id);
    }
    Ok(())
}
