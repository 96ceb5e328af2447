// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! Inserts return the new row ID via `last_insert_rowid()`, which is the
//! only backend helper mutations depend on.

pub mod accounts;
pub mod legacy;
pub mod records;
