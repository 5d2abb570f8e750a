//! Telegram command parsing.

/// Portfolio views available in portfolio mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Metrics,
    Holdings,
    Composition,
    Trend,
    Geography,
    MarketTypes,
    FullReport,
    Yearly,
}

/// Supported Telegram commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    QrCode,
    Stop,
    Investments,
    View(View),
}

/// Parse error for Telegram command messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    NotACommand,
    UnknownCommand(String),
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotACommand => write!(f, "message is not a command"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command `{cmd}`"),
        }
    }
}

impl std::error::Error for CommandParseError {}

/// Parse a Telegram message into a bot command.
///
/// A `@botname` suffix is ignored, as is anything after the command word.
pub fn parse_command(text: &str) -> Result<Command, CommandParseError> {
    let Some(raw_command) = text.split_whitespace().next() else {
        return Err(CommandParseError::NotACommand);
    };
    if !raw_command.starts_with('/') {
        return Err(CommandParseError::NotACommand);
    }

    let command = raw_command
        .split_once('@')
        .map_or(raw_command, |(head, _)| head);

    match command {
        "/start" => Ok(Command::Start),
        "/help" => Ok(Command::Help),
        "/qrcode" | "/qr" => Ok(Command::QrCode),
        "/stop" => Ok(Command::Stop),
        "/investimenti" | "/portfolio" => Ok(Command::Investments),
        "/metriche" | "/metrics" => Ok(Command::View(View::Metrics)),
        "/portafoglio" | "/holdings" => Ok(Command::View(View::Holdings)),
        "/grafico_composizione" | "/composition" => Ok(Command::View(View::Composition)),
        "/grafico_andamento" | "/trend" => Ok(Command::View(View::Trend)),
        "/grafico_geografico" | "/geography" => Ok(Command::View(View::Geography)),
        "/grafico_tipologia" | "/types" => Ok(Command::View(View::MarketTypes)),
        "/report_completo" | "/report" => Ok(Command::View(View::FullReport)),
        "/annuale" | "/yearly" => Ok(Command::View(View::Yearly)),
        other => Err(CommandParseError::UnknownCommand(other.to_string())),
    }
}

/// Welcome text for `/start`.
#[must_use]
pub fn start_text(portfolio_enabled: bool) -> String {
    let mut text = String::from(
        "👋 Hi! I'm a multi-purpose bot.\n\n\
        📤 Available modes:\n\
        • /qrcode - Turn links into QR codes\n",
    );
    if portfolio_enabled {
        text.push_str("• /investimenti - Analyse the investment portfolio\n");
    }
    text.push_str("\n💡 Examples:\n• /qrcode → then send a link\n");
    if portfolio_enabled {
        text.push_str("• /investimenti → then use the commands (e.g. /metriche)\n");
    }
    text.push_str("\nUse /help for more information!");
    text
}

/// Portfolio command list shown by `/help` and on entering portfolio mode.
#[must_use]
pub const fn portfolio_commands_help() -> &'static str {
    "• /metriche - Key metrics\n\
    • /portafoglio - Holdings table\n\
    • /grafico_composizione - Composition chart\n\
    • /grafico_andamento - Price trend\n\
    • /grafico_geografico - Geographic distribution\n\
    • /grafico_tipologia - Market type distribution\n\
    • /annuale - Yearly performance\n\
    • /report_completo - Full report\n"
}

/// Help text returned by `/help` and after an unknown command.
#[must_use]
pub fn command_help(portfolio_enabled: bool) -> String {
    let mut text = String::from(
        "ℹ️ How to use the bot:\n\n\
        ✅ Main commands:\n\
        /start - Start the bot\n\
        /help - Show this message\n\
        /qrcode - Enable QR code mode\n\
        /stop - Disable active modes\n\n",
    );
    if portfolio_enabled {
        text.push_str("📊 Portfolio mode:\n1. Send /investimenti to enable it\n2. Then use:\n");
        text.push_str(portfolio_commands_help());
        text.push('\n');
    }
    text.push_str(
        "📤 QR code mode:\n\
        1. Send /qrcode to enable it\n\
        2. Then send every link you want to convert\n\
        3. Links are processed automatically\n\n\
        💡 Use /stop to disable any mode",
    );
    text
}

/// Bot commands for Telegram menu registration.
///
/// Returns tuples of (command, description) for `set_my_commands`.
#[must_use]
pub fn bot_commands(portfolio_enabled: bool) -> Vec<(&'static str, &'static str)> {
    let mut commands = vec![
        ("start", "Start the bot"),
        ("help", "Show all commands"),
        ("qrcode", "Enable QR code mode"),
        ("stop", "Disable active modes"),
    ];
    if portfolio_enabled {
        commands.extend([
            ("investimenti", "Enable portfolio mode"),
            ("metriche", "Key portfolio metrics"),
            ("portafoglio", "Holdings table"),
            ("grafico_composizione", "Composition chart"),
            ("grafico_andamento", "Price trend chart"),
            ("grafico_geografico", "Geographic distribution"),
            ("grafico_tipologia", "Market type distribution"),
            ("annuale", "Yearly performance"),
            ("report_completo", "Full report"),
        ]);
    }
    commands
}
