/*!
# Roll-call Wheel

A browser-based name picker for colour-coded attendance documents, built in Rust.

## Overview

The attendance document (a Google Docs HTML export in which every student
name is coloured by attendance) is exported and uploaded. The server pulls
the names out of the document and groups them into three categories by text
colour. The page then spins a wheel over the categories the user selected and
picks one name at a time, removing every picked name from the pool.

## Architecture

### Frontend Layer
- **Technologies**: HTML, CSS, canvas
- **Key Components**:
  - Upload Zone - Drag-and-drop of the exported `.html` file
  - Category Toggles - Which attendance groups feed the wheel
  - Wheel Canvas - Replays the spin frames computed by the server

### Backend Layer
- **Technologies**: Rust, axum
- **Core Components**:
  - Attendance Extractor - Style-class colour scan and span classification
  - Picker Wheel - Decelerating rotation driven by an injected frame scheduler
  - Session Reducer - Immutable page state replaced on every user action
  - Renderer - Deterministic wheel geometry and PNG drawing

## Categories

| Colour | Category |
|---|---|
| `#6aa84f`, `#38761d` | Aanwezig (present) |
| `#e69138` | Verontschuldigd (excused) |
| anything else, or none | Afwezig (absent) |

The colour table and the roster of known names can be replaced through a
JSON configuration file (see [`config::Config`]).

## Modules

- **roster**: Known full names accepted as attendance records
- **category**: Attendance categories and the colour-to-category table
- **extractor**: HTML document to attendance lists
- **wheel**: Spin physics, frame scheduling and winner selection
- **render**: Wheel geometry and PNG rendering
- **session**: Picking workflow state and its transitions
- **config**: Roster and colour table configuration
- **app**: Routing and handlers (feature `web`)

## REST API Endpoints

- `POST /api/upload` - Multipart upload (field `file`, type `text/html`)
- `GET /api/session` - Current groups, toggles, last pick and candidates
- `POST /api/groups/{category}/toggle` - Enable or disable a category
- `POST /api/spin` - Spin the wheel; returns the winner and the frame offsets
- `GET /api/wheel` - Segment geometry of the current wheel
- `GET /api/wheel.png` - Rendered wheel at the current rotation
*/

pub mod category;
pub mod config;
pub mod error;
pub mod extractor;
pub mod render;
pub mod roster;
pub mod session;
pub mod wheel;

#[cfg(feature = "web")]
pub mod app;

/// Re-export the main types to make them easier to use
pub use category::{Category, ColorTable};
pub use config::Config;
pub use error::{ConfigError, ExtractError, SpinError};
pub use extractor::{Attendance, Extractor, extract};
pub use roster::KnownNames;
pub use session::{Action, Session};
pub use wheel::{FrameScheduler, Wheel, winner_index};
