use super::afk::{afk_nickname, can_edit_nickname, is_afk};
use super::snipe::render_fields;
use crate::utils::escape_markdown;
use crate::{Context, Error};
use chrono::Utc;
use poise::command;
use poise::serenity_prelude::{
    ChannelId, CreateEmbed, EditMember, GuildChannel, GuildId, Mentionable,
};
use poise::CreateReply;
use std::time::Instant;
use tracing::debug;

/// Renders a duration the way `H:MM:SS` clocks do, with a day count in front
/// once it exceeds a day.
fn format_uptime(total_secs: u64) -> String {
    let days = total_secs / 86400;
    let hours = (total_secs % 86400) / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    let clock = format!("{hours}:{mins:02}:{secs:02}");
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        _ => format!("{days} days, {clock}"),
    }
}

/// Sends the bots ping.
#[command(prefix_command, slash_command, category = "Miscellaneous")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let start = Instant::now();
    let reply = ctx.reply("Pong!").await?;
    let latency = start.elapsed().as_millis();

    reply
        .edit(
            ctx,
            CreateReply::default().content(format!("Pong! `{latency}ms`")),
        )
        .await?;
    Ok(())
}

/// Sends info about the bot.
#[command(prefix_command, slash_command, category = "Miscellaneous")]
pub async fn info(ctx: Context<'_>) -> Result<(), Error> {
    let uptime = (Utc::now() - ctx.data().ready_at).num_seconds().max(0) as u64;

    ctx.reply(format!(
        "__**Bot Info**__\n**Version:** v{}\n**Uptime:** `{}`",
        env!("CARGO_PKG_VERSION"),
        format_uptime(uptime)
    ))
    .await?;
    Ok(())
}

/// Hello!
#[command(prefix_command, slash_command, category = "Miscellaneous")]
pub async fn hello(ctx: Context<'_>) -> Result<(), Error> {
    ctx.reply(format!(
        "Hi {}, yes the bot is running :)",
        escape_markdown(&ctx.author().name)
    ))
    .await?;
    Ok(())
}

/// Sends the total members in the server.
#[command(prefix_command, slash_command, guild_only, category = "Miscellaneous")]
pub async fn members(ctx: Context<'_>) -> Result<(), Error> {
    let member_count = ctx.guild().map(|guild| guild.member_count);

    let message = match member_count {
        Some(count) => format!("There are `{count}` users in this server."),
        None => "❌ This server isn't cached yet, try again in a moment.".to_string(),
    };
    ctx.reply(message).await?;
    Ok(())
}

/// Sets you as AFK.
#[command(prefix_command, slash_command, guild_only, category = "Miscellaneous")]
pub async fn afk(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };
    let Some(author) = ctx.author_member().await else {
        return Ok(());
    };

    let display_name = author.display_name().to_string();
    // Already AFK, their next message will clear it.
    if is_afk(&display_name) {
        return Ok(());
    }

    let bot = guild_id.member(ctx, ctx.framework().bot_id).await?;
    let can_edit = {
        let Some(guild) = ctx.guild() else {
            return Ok(());
        };
        can_edit_nickname(
            &guild.roles,
            guild.owner_id,
            &bot.roles,
            author.user.id,
            &author.roles,
        )
    };

    if !can_edit {
        ctx.reply(
            "I cannot set you as AFK because my role is lower than yours. \
            You can edit your nickname to set yourself as AFK (Add [AFK] to the start of it).",
        )
        .await?;
        return Ok(());
    }

    let nickname = afk_nickname(&display_name);
    debug!("Setting nickname of {} to {}", author.user.id, nickname);
    guild_id
        .edit_member(ctx, author.user.id, EditMember::new().nickname(nickname))
        .await?;

    ctx.reply("Set your status to AFK. You can now touch grass freely 🌲.")
        .await?;
    Ok(())
}

/// Picks the channel `snipe` reads from. `None` when the requested channel
/// belongs to another guild, whose history must not leak into this one.
fn snipe_target(
    current: ChannelId,
    current_guild: Option<GuildId>,
    requested: Option<(ChannelId, GuildId)>,
) -> Option<ChannelId> {
    match requested {
        None => Some(current),
        Some((channel, guild)) if Some(guild) == current_guild => Some(channel),
        Some(_) => None,
    }
}

fn nothing_to_snipe(target: ChannelId, current: ChannelId) -> String {
    if target == current {
        "There are no messages to be sniped in this channel.".to_string()
    } else {
        format!("There are no messages to be sniped in {}", target.mention())
    }
}

/// Sends the latest deleted messages.
///
/// Sends the last 5 deleted messages in a specified channel.
/// If the channel isn't specified, it uses the current channel.
#[command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    category = "Miscellaneous"
)]
pub async fn snipe(
    ctx: Context<'_>,
    #[description = "Channel to show deleted messages for"] channel: Option<GuildChannel>,
) -> Result<(), Error> {
    let current = ctx.channel_id();
    let requested = channel.as_ref().map(|channel| (channel.id, channel.guild_id));
    let Some(target) = snipe_target(current, ctx.guild_id(), requested) else {
        ctx.reply("❌ That channel isn't in this server.").await?;
        return Ok(());
    };
    let history = ctx.data().snipes.get_history(target);

    if history.is_empty() {
        ctx.reply(nothing_to_snipe(target, current)).await?;
        return Ok(());
    }

    let place = match &channel {
        Some(channel) if channel.id != current => format!("#{}", channel.name),
        _ => "the current channel".to_string(),
    };

    let embed = CreateEmbed::new()
        .title(format!("Showing last 5 deleted messages for {place}"))
        .description("The lower the number is, the more recent it got deleted.")
        .colour(fastrand::u32(..=0xFF_FFFF))
        .fields(
            render_fields(&history)
                .into_iter()
                .map(|(name, value)| (name, value, false)),
        );

    ctx.send(CreateReply::default().reply(true).embed(embed))
        .await?;
    Ok(())
}

/// Shows the available commands.
#[command(prefix_command, slash_command, track_edits, category = "Miscellaneous")]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> Result<(), Error> {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            extra_text_at_bottom: "Use help <command> for more info on a command.",
            ..Default::default()
        },
    )
    .await?;
    Ok(())
}
