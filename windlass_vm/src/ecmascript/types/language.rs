// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod bigint;
mod number;
mod object;
mod string;
mod symbol;
mod value;

pub use bigint::*;
pub use number::*;
pub use object::*;
pub use string::*;
pub use symbol::*;
pub use value::*;
