pub mod error;

pub mod config;

pub mod controller {
    pub mod actions;
    pub use actions::Action;

    pub mod event_loop;
    pub use event_loop::{EventLoop, TaskResult};

    pub mod keybindings;
    pub use keybindings::{KeyBindings, KeyDisposition, NavCommand};

    pub mod navigator;
    pub use navigator::{Navigator, OpenNavigator};

    pub mod search_controller;
    pub use search_controller::{ControllerOptions, SearchController};
}

pub mod model {
    pub mod location;
    pub use location::{Location, LocationSync};

    pub mod result_list;
    pub use result_list::{ResultList, ResultRecord, ResultRow};

    pub mod search_input;
    pub use search_input::SearchInput;

    pub mod ui_state;
    pub use ui_state::{RedrawFlag, UIState};

    pub mod viewport;
    pub use viewport::{ResultsViewport, RowHandle};
}

pub mod tasks {
    pub mod search_task;
    pub use search_task::{SearchBackend, SearchTask};

    pub mod command_search;
    pub use command_search::CommandBackend;

    pub mod index_search;
    pub use index_search::IndexBackend;
}

pub mod view {
    pub mod theme;

    pub mod ui;

    pub mod snapshots;
    pub use snapshots::*;

    pub mod components {
        pub mod error_banner;
        pub use error_banner::ErrorBanner;
        pub mod loading_result;
        pub use loading_result::LoadingResult;
        pub mod result_list;
        pub use result_list::ResultListView;
        pub mod search_header;
        pub use search_header::SearchHeader;
        pub mod status_bar;
        pub use status_bar::StatusBar;
    }
}

pub mod logging;
pub use logging::Logger;

pub mod util {
    pub mod debounce;
}

pub use error::{AppError, SearchError};

pub use model::ui_state::UIState;
