pub mod detection {
    pub mod domain {
        pub mod landmark_detector;
        pub mod landmarks;
    }
    pub mod infrastructure;
}

pub mod gesture {
    pub mod domain {
        pub mod frame_resolver;
        pub mod gesture;
        pub mod gesture_classifier;
    }
}

pub mod pipeline {
    pub mod detect_gesture_use_case;
    pub mod live_reaction_use_case;
}

pub mod reaction {
    pub mod domain {
        pub mod reaction_presenter;
        pub mod reaction_state_machine;
    }
    pub mod infrastructure {
        pub mod reaction_library;
    }
}

pub mod shared {
    pub mod config;
    pub mod constants;
    pub mod error;
    pub mod frame;
    pub mod video_metadata;
}

pub mod video {
    pub mod domain {
        pub mod video_reader;
    }
    pub mod infrastructure {
        pub mod camera_reader;
        pub mod image_file_reader;
    }
}
