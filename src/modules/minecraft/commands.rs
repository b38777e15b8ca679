use super::status::query_status;
use crate::{Context, Error};
use poise::command;
use poise::serenity_prelude::{CreateActionRow, CreateButton};
use poise::CreateReply;
use tracing::warn;

const WEBSITE: &str = "https://landsofminearchy.com";
const STAFF_APPLICATION: &str =
    "https://docs.google.com/forms/d/1I7Rh_e-ZTXm5L51XoKZsOAk7NAJcHomUUCuOlQcARvY/viewform";

const SERVERS: &[(&str, &str)] = &[
    (
        "smp",
        "The SMP is a server where people can play survival Minecraft alongside other members of the community, with a multitude of features such as shops, auctions and more.",
    ),
    (
        "kitpvp",
        "The KitPvP server is a server where players can fight each other with preset items called kits. These kits can be used in prebuilt arenas. The aim of KitPvp is too defeat your opponent in combat, with whatever kit you chose.",
    ),
];

fn version_note(ctx: &Context<'_>) -> String {
    format!(
        "Note: Minecraft {} is required to join.",
        ctx.data().config.minecraft.version
    )
}

fn server_names() -> String {
    SERVERS
        .iter()
        .map(|(name, _)| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolves a `server` argument to the reply text.
fn describe_server(server: Option<&str>) -> String {
    let Some(server) = server else {
        return format!(
            "You must specify a server. The available servers are: {}.",
            server_names()
        );
    };

    let server = server.to_lowercase();
    match SERVERS.iter().find(|(name, _)| *name == server) {
        Some((_, description)) => description.to_string(),
        None => format!(
            "Invalid server. The available servers are: {}.",
            server_names()
        ),
    }
}

/// Replies with a single link button and optional text.
async fn link_reply(
    ctx: Context<'_>,
    content: Option<&str>,
    label: &str,
    url: &str,
) -> Result<(), Error> {
    let button = CreateButton::new_link(url).label(label);
    let mut reply = CreateReply::default()
        .reply(true)
        .components(vec![CreateActionRow::Buttons(vec![button])]);
    if let Some(content) = content {
        reply = reply.content(content);
    }

    ctx.send(reply).await?;
    Ok(())
}

/// Sends the server IP.
#[command(prefix_command, slash_command, category = "Minecraft Server", subcommands("java", "bedrock"))]
pub async fn ip(ctx: Context<'_>) -> Result<(), Error> {
    let minecraft = &ctx.data().config.minecraft;
    let message = format!(
        "Java edition IP: `{}`\nBedrock edition IP: `{}`\n{}",
        minecraft.java_ip,
        minecraft.bedrock_ip,
        version_note(&ctx)
    );
    ctx.reply(message).await?;
    Ok(())
}

/// Sends the Java edition IP.
#[command(prefix_command, slash_command, category = "Minecraft Server")]
pub async fn java(ctx: Context<'_>) -> Result<(), Error> {
    let message = format!(
        "The IP to connect on Minecraft Java edition is `{}`\n{}",
        ctx.data().config.minecraft.java_ip,
        version_note(&ctx)
    );
    ctx.reply(message).await?;
    Ok(())
}

/// Sends the Bedrock edition IP.
#[command(prefix_command, slash_command, category = "Minecraft Server")]
pub async fn bedrock(ctx: Context<'_>) -> Result<(), Error> {
    let message = format!(
        "The IP to connect on Minecraft Bedrock edition is `{}`\n{}",
        ctx.data().config.minecraft.bedrock_ip,
        version_note(&ctx)
    );
    ctx.reply(message).await?;
    Ok(())
}

/// Sends info about a specific server.
#[command(prefix_command, slash_command, category = "Minecraft Server", aliases("servers"))]
pub async fn server(
    ctx: Context<'_>,
    #[description = "Server to describe"] server: Option<String>,
) -> Result<(), Error> {
    ctx.reply(describe_server(server.as_deref())).await?;
    Ok(())
}

/// Shows the total player count of the Minecraft server and who is online.
#[command(prefix_command, slash_command, category = "Minecraft Server", aliases("players", "playerlist"))]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;

    let minecraft = &ctx.data().config.minecraft;
    match query_status(&minecraft.status_api, &minecraft.java_ip).await {
        Ok(status) => {
            ctx.reply(status.summary()).await?;
        }
        Err(e) => {
            warn!("Failed to query status of {}: {}", minecraft.java_ip, e);
            ctx.reply("❌ Couldn't reach the Minecraft server right now, try again later.")
                .await?;
        }
    }
    Ok(())
}

/// Sends the link to the wiki.
#[command(prefix_command, slash_command, category = "Minecraft Server")]
pub async fn wiki(ctx: Context<'_>) -> Result<(), Error> {
    link_reply(ctx, None, "Go to the wiki!", &format!("{WEBSITE}/wiki")).await
}

/// Sends the link to the store.
#[command(prefix_command, slash_command, category = "Minecraft Server")]
pub async fn store(ctx: Context<'_>) -> Result<(), Error> {
    link_reply(ctx, None, "Go to the store!", &format!("{WEBSITE}/store")).await
}

/// Sends the link to the forum.
#[command(prefix_command, slash_command, category = "Minecraft Server", aliases("forums"))]
pub async fn forum(ctx: Context<'_>) -> Result<(), Error> {
    link_reply(ctx, None, "Go to the forum!", &format!("{WEBSITE}/forum")).await
}

/// Sends the link to the dynmap.
#[command(prefix_command, slash_command, category = "Minecraft Server", aliases("map"))]
pub async fn dynmap(ctx: Context<'_>) -> Result<(), Error> {
    link_reply(
        ctx,
        Some("The dynmap is an interactive, live map of our Minecraft server."),
        "Go to the dynmap!",
        &format!("{WEBSITE}/dynmap"),
    )
    .await
}

/// Sends the links you can use to vote for the Minecraft server.
#[command(prefix_command, slash_command, category = "Minecraft Server")]
pub async fn vote(ctx: Context<'_>) -> Result<(), Error> {
    link_reply(
        ctx,
        None,
        "Vote for the Minecraft server!",
        &format!("{WEBSITE}/vote"),
    )
    .await
}

/// Sends the link to the staff application.
#[command(
    prefix_command,
    slash_command,
    category = "Minecraft Server",
    rename = "staff-application",
    aliases("apply", "staff-applications")
)]
pub async fn staff_application(ctx: Context<'_>) -> Result<(), Error> {
    link_reply(ctx, None, "Apply for staff!", STAFF_APPLICATION).await
}
