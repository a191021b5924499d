//! Signed-in views: identity, sidebar, notifications, search and logs.

use std::sync::Arc;

use hris_core::Role;
use hris_portal::navigation::Guard;
use hris_portal::sync::{HeaderSync, LogSearch, PanelState, SidebarSync};
use hris_portal::{ApiClient, PortalConfig};
use tokio::time::{self, MissedTickBehavior};

use super::CommandError;

fn header(api: &ApiClient, config: &PortalConfig) -> HeaderSync {
    HeaderSync::new(api.clone(), config.asset_url.clone())
}

fn signed_in_role(api: &ApiClient) -> Result<Role, CommandError> {
    let session = api.session().current()?.ok_or(CommandError::SignedOut)?;
    match session.role {
        Some(role) => Ok(role),
        None => Err(CommandError::UnknownRole(
            api.session().stored_role()?.unwrap_or_default(),
        )),
    }
}

pub async fn whoami(api: &ApiClient, config: &PortalConfig) -> Result<(), CommandError> {
    let header = header(api, config);
    if let Guard::Redirect(route) = header.sync().await? {
        tracing::info!("Not signed in (would redirect to {route})");
        return Err(CommandError::SignedOut);
    }

    let state = header.state();
    let unread = state.has_unread();
    let has_panel = state.panel_title().is_some();
    let Some(identity) = state.identity else {
        return Err(CommandError::SignedOut);
    };
    let role = identity.role.map_or("unknown", Role::as_str);
    tracing::info!("{} - {}", identity.title, identity.subtitle);
    tracing::info!("  [{}] {} ({role})", identity.initial, identity.name);
    if let Some(url) = identity.avatar_url {
        tracing::info!("  Photo: {url}");
    }
    tracing::info!("  Home: {}", header.home_route());
    if has_panel {
        tracing::info!("  Unread notifications: {}", if unread { "yes" } else { "no" });
    }
    Ok(())
}

/// Print the sidebar, with badges freshly polled.
pub async fn menu(api: &ApiClient, path: Option<&str>) -> Result<(), CommandError> {
    if !api.session().is_authenticated()? {
        return Err(CommandError::SignedOut);
    }

    let sidebar = SidebarSync::new(api.clone());
    if let Some(path) = path {
        sidebar.on_navigate(path);
    }
    sidebar.refresh().await;

    let items = sidebar.menu()?;
    if items.is_empty() {
        tracing::warn!("No menu for this session");
        return Ok(());
    }

    let active = sidebar.active_key()?;
    for item in items {
        let marker = if active == Some(item.key) { '>' } else { ' ' };
        let mut line = format!("{marker} {:<16} {}", item.label, item.route);
        if let Some(count) = item.count_label() {
            line.push_str(&format!(" ({count})"));
        }
        if item.badge {
            line.push_str(if item.critical { " !!" } else { " !" });
        }
        tracing::info!("{line}");
    }
    Ok(())
}

/// List notifications. `open` marks them read the way opening the panel does.
pub async fn notifications(
    api: &ApiClient,
    config: &PortalConfig,
    open: bool,
) -> Result<(), CommandError> {
    let header = header(api, config);
    if let Guard::Redirect(_) = header.sync().await? {
        return Err(CommandError::SignedOut);
    }

    let before = header.state();
    let Some(title) = before.panel_title() else {
        tracing::info!("This role has no notification panel");
        return Ok(());
    };

    if open && header.toggle_panel().await == PanelState::Open {
        tracing::debug!("Panel opened");
    }

    let state = header.state();
    tracing::info!("{title} ({} total)", state.notifications.len());
    for (n, was) in state.notifications.iter().zip(&before.notifications) {
        let dot = if was.is_read { ' ' } else { '*' };
        tracing::info!(
            "{dot} {}  {}: {}",
            n.created_at.format("%Y-%m-%d %H:%M"),
            n.title,
            n.message
        );
    }
    Ok(())
}

pub fn search(api: &ApiClient, config: &PortalConfig, query: &str) -> Result<(), CommandError> {
    match header(api, config).search(query)? {
        Some(route) => tracing::info!("{query:?} -> {route}"),
        None => tracing::info!("No page matches {query:?}"),
    }
    Ok(())
}

/// Search the audit feed for the signed-in role.
pub async fn logs(api: &ApiClient, query: &str) -> Result<(), CommandError> {
    let role = signed_in_role(api)?;
    let search = LogSearch::new(api.clone());
    search.search(role, query).await?;

    let Some((_, entries)) = search.shown() else {
        return Ok(());
    };
    if entries.is_empty() {
        tracing::info!("No log entries");
    }
    for entry in entries {
        let actor = entry.user.as_ref().map_or("system", |u| u.name.as_str());
        tracing::info!(
            "{}  {actor}  {}  {}",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.action,
            entry.details.as_deref().unwrap_or_default()
        );
    }
    Ok(())
}

/// Keep the header and sidebar live until Ctrl-C, reporting badge changes.
pub async fn watch(api: &ApiClient, config: &PortalConfig) -> Result<(), CommandError> {
    signed_in_role(api)?;

    let sidebar = Arc::new(SidebarSync::new(api.clone()));
    let header = Arc::new(header(api, config));
    let _polling = Arc::clone(&sidebar).spawn_polling(config.poll_interval);
    let _header = Arc::clone(&header).spawn();

    let mut ticker = time::interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = None;
    tracing::info!(period = ?config.poll_interval, "Watching badges (Ctrl-C to stop)");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let badges = sidebar.badges();
                if last.as_ref() != Some(&badges) {
                    tracing::info!(
                        pending_leaves = badges.pending_leaves,
                        show_leave_count = badges.show_leave_count,
                        days_left = ?badges.days_left,
                        billing_critical = badges.billing_critical(),
                        unread = header.state().has_unread(),
                        "Badges"
                    );
                    last = Some(badges);
                }
            }
        }
    }
    Ok(())
}
