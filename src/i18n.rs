use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Es, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::Es => "es",
            Language::En => "en",
        }
    }
}

/// Looks up a UI string; unknown keys come back unchanged.
pub fn t<'a>(lang: Language, key: &'a str) -> &'a str {
    let hit: Option<&'a str> = match lang {
        Language::Es => es(key),
        Language::En => en(key),
    };
    hit.unwrap_or(key)
}

fn es(key: &str) -> Option<&'static str> {
    Some(match key {
        "nav.settings" => "CONFIGURACIÓN",
        "nav.minigames" => "MINI-JUEGOS",
        "settings.title" => "⚔️ CONFIGURACIÓN ⚔️",
        "settings.language" => "IDIOMA",
        "settings.theme" => "TEMA DE COLORES",
        "settings.bgMusic" => "MÚSICA DE FONDO",
        "settings.volume" => "Volumen",
        "settings.musicOff" => "Música desactivada por defecto",
        "settings.cursor" => "CURSOR PERSONALIZADO",
        "settings.cursorHint" => "Desactiva para usar el cursor normal del sistema",
        "settings.exit" => "◄ ESC para salir",
        "music.title" => "REPRODUCTOR DE MÚSICA",
        "music.nowPlaying" => "Reproduciendo ahora",
        "music.playlist" => "Lista de reproducción",
        "music.volume" => "Volumen",
        "games.snake" => "SERPIENTE",
        "games.pong" => "PONG",
        "games.clicker" => "CLICKER VIRGEN",
        "hub.classic" => "Clásico arcade",
        "hub.vsCpu" => "VS CPU",
        "hub.incremental" => "Incremental",
        "hub.favorite" => "Favorito",
        "hub.secretHint" => "¡Escribe \"VIRGEN\" en cualquier momento para desbloquear un secreto!",
        "secret.title" => "¡Eres un verdadero VIRGEN!",
        "common.close" => "Cerrar",
        "game.score" => "PUNTOS",
        "game.best" => "MEJOR",
        "game.over" => "¡GAME OVER!",
        "game.paused" => "PAUSADO",
        "game.restart" => "REINICIAR",
        "game.youWin" => "¡GANASTE!",
        "game.youLose" => "¡PERDISTE!",
        "snake.controls" => "↑↓←→ o WASD para mover • ESPACIO para pausar • ESC para salir",
        "pong.controls" => "↑↓ o W/S para mover • ESPACIO para pausar • ESC para salir",
        "clicker.points" => "PUNTOS",
        "clicker.power" => "PODER",
        "clicker.auto" => "AUTO",
        "clicker.morePower" => "Más Poder",
        "clicker.autoClick" => "Auto-Click",
        "clicker.achievements" => "LOGROS",
        "achievement.unlocked" => "Logro Desbloqueado",
        "achievement.first100" => "100 clicks",
        "achievement.first1000" => "1.000 clicks",
        "achievement.first10000" => "10.000 clicks",
        "achievement.powerUp" => "Poder x5",
        "achievement.automate" => "3 auto-clickers",
        "secret.found" => "¡Secreto descubierto!",
        "highscore.new" => "¡Nuevo récord!",
        _ => return None,
    })
}

fn en(key: &str) -> Option<&'static str> {
    Some(match key {
        "nav.settings" => "SETTINGS",
        "nav.minigames" => "MINI-GAMES",
        "settings.title" => "⚔️ SETTINGS ⚔️",
        "settings.language" => "LANGUAGE",
        "settings.theme" => "COLOR THEME",
        "settings.bgMusic" => "BACKGROUND MUSIC",
        "settings.volume" => "Volume",
        "settings.musicOff" => "Music disabled by default",
        "settings.cursor" => "CUSTOM CURSOR",
        "settings.cursorHint" => "Disable to use the normal system cursor",
        "settings.exit" => "◄ ESC to exit",
        "music.title" => "MUSIC PLAYER",
        "music.nowPlaying" => "Now Playing",
        "music.playlist" => "Playlist",
        "music.volume" => "Volume",
        "games.snake" => "SNAKE",
        "games.pong" => "PONG",
        "games.clicker" => "VIRGIN CLICKER",
        "hub.classic" => "Classic arcade",
        "hub.vsCpu" => "VS CPU",
        "hub.incremental" => "Incremental",
        "hub.favorite" => "Favorite",
        "hub.secretHint" => "Type \"VIRGEN\" anytime to unlock a secret!",
        "secret.title" => "You are a true VIRGEN!",
        "common.close" => "Close",
        "game.score" => "SCORE",
        "game.best" => "BEST",
        "game.over" => "GAME OVER!",
        "game.paused" => "PAUSED",
        "game.restart" => "RESTART",
        "game.youWin" => "YOU WIN!",
        "game.youLose" => "YOU LOSE!",
        "snake.controls" => "↑↓←→ or WASD to move • SPACE to pause • ESC to exit",
        "pong.controls" => "↑↓ or W/S to move • SPACE to pause • ESC to exit",
        "clicker.points" => "POINTS",
        "clicker.power" => "POWER",
        "clicker.auto" => "AUTO",
        "clicker.morePower" => "More Power",
        "clicker.autoClick" => "Auto-Click",
        "clicker.achievements" => "ACHIEVEMENTS",
        "achievement.unlocked" => "Achievement Unlocked",
        "achievement.first100" => "100 clicks",
        "achievement.first1000" => "1,000 clicks",
        "achievement.first10000" => "10,000 clicks",
        "achievement.powerUp" => "Power x5",
        "achievement.automate" => "3 auto-clickers",
        "secret.found" => "Secret discovered!",
        "highscore.new" => "New high score!",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_and_falls_back_to_key() {
        assert_eq!(t(Language::En, "game.paused"), "PAUSED");
        assert_eq!(t(Language::Es, "game.paused"), "PAUSADO");
        assert_eq!(t(Language::En, "no.such.key"), "no.such.key");
    }

    #[test]
    fn spanish_is_default() {
        assert_eq!(Language::default(), Language::Es);
    }
}
