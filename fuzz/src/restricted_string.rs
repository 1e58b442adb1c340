use std::ops::Deref;

use arbitrary::{Arbitrary, Result, Unstructured};

#[derive(Arbitrary)]
enum Symbol {
	Zero,
	Succ,
	Transfer,
	Jump,
	Digit(u8),
	Space,
	Tab,
	Return,
	LineFeed,
	Other(char),
}

impl From<Symbol> for char {
	fn from(value: Symbol) -> Self {
		match value {
			Symbol::Zero => 'Z',
			Symbol::Succ => 'S',
			Symbol::Transfer => 'T',
			Symbol::Jump => 'J',
			Symbol::Digit(digit) => char::from(b'0' + digit % 10),
			Symbol::Space => ' ',
			Symbol::Tab => '\t',
			Symbol::Return => '\r',
			Symbol::LineFeed => '\n',
			Symbol::Other(c) => c,
		}
	}
}

/// Text drawn mostly from the characters of the program grammar, in any order.
#[derive(Debug)]
pub struct RestrictedString {
	content: String,
}

impl Arbitrary<'_> for RestrictedString {
	fn arbitrary(u: &mut Unstructured) -> Result<Self> {
		let len = u.arbitrary_len::<Symbol>()?;
		let mut content = String::with_capacity(len);

		for _ in 0..len {
			let element = Symbol::arbitrary(u)?;

			content.push(element.into());
		}

		Ok(Self { content })
	}
}

impl Deref for RestrictedString {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.content
	}
}
