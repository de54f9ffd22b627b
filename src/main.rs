use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{LevelFilter, info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{fs::File, io, sync::Arc, time::Duration};

use polymap::{
    basemap::Basemap,
    config::Config,
    screen::{Action, MapScreen},
    store::HttpPolygonStore,
    ui,
    worker::Worker,
};

fn init_logging(config: &Config) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    // terminal należy do interfejsu, więc logi idą do pliku
    match File::create(&config.log_file) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    builder.init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    init_logging(&config);
    info!("Starting polymap, API at {:?}", config.api_base_url);

    let basemap = config.basemap.as_deref().and_then(|source| {
        Basemap::load(source, &config.map_access_token)
            .map_err(|err| warn!("basemap {source} not loaded: {err}"))
            .ok()
    });
    let worker = Worker::new(Arc::new(HttpPolygonStore::new(&config)?));
    let mut screen = MapScreen::new(&config, basemap);
    worker.submit(screen.mount());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        for outcome in worker.drain() {
            if let Some(request) = screen.apply(outcome) {
                worker.submit(request);
            }
        }

        terminal.draw(|f| ui::draw(f, &screen))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) = event::read()? {
                match screen.handle_input(code) {
                    Some(Action::Quit) => break,
                    Some(Action::Send(request)) => worker.submit(request),
                    None => {}
                }
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    info!("polymap closed");
    Ok(())
}
