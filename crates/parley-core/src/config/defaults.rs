pub(super) fn default_true() -> bool {
    true
}
pub(super) fn default_openai_model() -> String {
    "gpt-4".into()
}
pub(super) fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".into()
}
pub(super) fn default_temperature() -> f32 {
    0.7
}
pub(super) fn default_translate_base_url() -> String {
    "https://translate.googleapis.com".into()
}
pub(super) fn default_pivot_language() -> String {
    "en".into()
}
pub(super) fn default_max_turns() -> usize {
    10
}
pub(super) fn default_welcome_message() -> String {
    "Welcome to your Astrology Bot! Please enter your astrological query.".into()
}
pub(super) fn default_help_message() -> String {
    "Just write to me in any language and I will answer in the same language.\n\n\
     /setinfo Name, Birthday (YYYY-MM-DD), Birthplace - Enter your details\n\
     /viewinfo - Show your details\n\
     /today - Today's horoscope\n\
     /tomorrow - Tomorrow's horoscope\n\
     /year - Annual forecast\n\
     /start - Show the welcome message\n\
     /help - Show this help"
        .into()
}
