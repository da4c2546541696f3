//! Fixed user-facing reply texts.
//!
//! Every handler resolves its outcome to one of these strings; errors never
//! surface raw. The texts are the bot's product copy and are kept in one
//! place so handlers stay free of literals.

use crate::types::RequiredChannel;

// ── General ──
pub const WELCOME: &str = "Xush kelibsiz!";
pub const UNKNOWN_COMMAND: &str = "Nomalum buyruq!";

// ── Subscription gate ──
pub const SUBSCRIBE_PROMPT: &str = "Iltimos, quyidagi kanallarga obuna bo'ling:";
pub const RECHECK_BUTTON: &str = "A'zo bo'ldim ✅";
pub const SUBSCRIPTION_CONFIRMED: &str = "Rahmat! Endi botdan to'liq foydalanishingiz mumkin.";

// ── Channels ──
pub const ADD_CHANNEL_USAGE: &str =
    "Iltimos, kanal nomini kiriting: /add_channel <channel_username>";
pub const CHANNEL_NOT_RESOLVABLE: &str = "Iltimos, kanal nomini to'g'ri kiriting";
pub const CHANNEL_EXISTS: &str = "Bu kanal allaqachon qo'shilgan.";
pub const CHANNEL_ADD_FAILED: &str = "Kanalni qo'shishda xatolik yuz berdi.";
pub const CHANNEL_LIST_FAILED: &str = "Kanallarni olishda xatolik yuz berdi.";
pub const DELETE_CHANNEL_USAGE: &str =
    "Iltimos, kanal nomini kiriting: /delete_channel <channel_name>";
pub const CHANNEL_DELETE_FAILED: &str = "Kanalni o'chirishda xatolik yuz berdi.";

// ── Films ──
pub const ADD_FILM_USAGE: &str = "Kino url, code yoki nomi kiritilmagan!";
pub const FILM_CODE_NOT_A_NUMBER: &str = "Kino kodi son bo'lishi kerak";
pub const FILM_URL_EXISTS: &str = "Kino allaqachon qo'shilgan!";
pub const FILM_CODE_EXISTS: &str = "Bu kodli kino mavjud!";
pub const FILM_ADD_FAILED: &str = "Kinoni qo'shishda xatolik yuz berdi.";
pub const DELETE_FILM_USAGE: &str = "Iltimos, kino kodini kiriting: /delete_film <code>";
pub const FILM_DELETE_FAILED: &str = "Kinoni o'chirishda xatolik yuz berdi.";
pub const FILM_NOT_FOUND: &str = "Kino topilmadi!";

pub fn channel_added(name: &str) -> String {
    format!("Kanal qo'shildi: {name}")
}

pub fn channel_deleted(name: &str) -> String {
    format!("Kanal o'chirildi: {name}")
}

pub fn channel_list(channels: &[RequiredChannel]) -> String {
    let listing = channels
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c.name))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Qo'shilgan kanallar:\n<b>{listing}</b>")
}

pub fn film_added(name: &str) -> String {
    format!("Kino qo'shildi: {name}")
}

pub fn film_deleted(code: i64) -> String {
    format!("Kino o'chirildi: {code}")
}

pub fn user_count(count: u64) -> String {
    format!("Foydalanuvchilar soni: {count}")
}
