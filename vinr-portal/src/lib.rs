/*
#################################################################################
# See LICENSE.md for full license information.                                  #
# Software: Vinr Affiliate Platform                                             #
# License: Drasil Source Available License v1.0                                 #
# Licensors: Torben Poguntke (torben@drasil.io) & Zak Bassey (zak@drasil.io)    #
#################################################################################
*/
pub mod affiliates;
pub mod creatives;
pub mod earnings;
pub mod notifications;
pub mod offers;
pub mod programs;
pub mod settlement;

pub mod error;
pub use error::*;
