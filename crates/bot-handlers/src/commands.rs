use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Debug, Clone, Copy, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "Main menu")]
    Start,
    #[command(description = "Show balance")]
    Balance,
    #[command(description = "Display this text")]
    Help,
}
