mod components;
mod context;
mod events;
mod game_loop;
mod i18n;
mod model;
mod rng;
mod secret_code;
mod sound;
mod state;
mod storage;
mod util;
mod youtube;

use components::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
